//! # Domain Entities
//!
//! Signer sets, outgoing transactions, delegate keys and the state snapshot.

use super::errors::{AttestationError, AttestationResult};
use super::value_objects::{
    AccountAddress, EthAddress, OutgoingTxKind, StoreIndex, ValidatorAddress,
};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

/// One member of a signer set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthereumSigner {
    /// Foreign-chain address, absent when the validator never registered one.
    pub ethereum_address: Option<EthAddress>,
    /// Normalized power. Members of one set sum to at most `u32::MAX`.
    pub power: u32,
}

/// Versioned snapshot of normalized validator power.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerSetTx {
    /// Monotonic nonce.
    pub nonce: u64,
    /// Host block height the set was built at.
    pub height: u64,
    /// Members in power source order.
    pub members: Vec<EthereumSigner>,
}

impl SignerSetTx {
    /// Create a signer set.
    pub fn new(nonce: u64, height: u64, members: Vec<EthereumSigner>) -> Self {
        Self {
            nonce,
            height,
            members,
        }
    }

    /// Store index confirmations over this set are filed under.
    pub fn store_index(&self) -> StoreIndex {
        StoreIndex::signer_set(self.nonce)
    }

    /// Sum of member power.
    pub fn total_power(&self) -> u64 {
        self.members.iter().map(|m| u64::from(m.power)).sum()
    }
}

/// Host validator and its raw consensus power.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorPower {
    /// Validator operator address.
    pub validator: ValidatorAddress,
    /// Raw power, any unit.
    pub power: u64,
}

impl ValidatorPower {
    /// Pair a validator with its power.
    pub fn new(validator: ValidatorAddress, power: u64) -> Self {
        Self { validator, power }
    }
}

/// ERC-20 amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Token {
    /// Token contract.
    pub contract: EthAddress,
    /// Amount in base units.
    pub amount: u128,
}

/// User withdrawal carried inside a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendToEthereum {
    /// Pool id.
    pub id: u64,
    /// Host-chain sender.
    pub sender: AccountAddress,
    /// Foreign-chain recipient.
    pub ethereum_recipient: EthAddress,
    /// Amount sent.
    pub erc20_token: Erc20Token,
    /// Fee paid to the relayer.
    pub erc20_fee: Erc20Token,
}

/// Batch of withdrawals of a single token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTx {
    /// Per-token batch nonce.
    pub batch_nonce: u64,
    /// Foreign block height after which the batch is void.
    pub timeout: u64,
    /// Withdrawals.
    pub transactions: Vec<SendToEthereum>,
    /// Token every withdrawal moves.
    pub token_contract: EthAddress,
    /// Host height the batch was created at.
    pub height: u64,
}

/// Arbitrary call on the foreign chain.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCallTx {
    /// Scope within which invalidation nonces advance.
    #[serde_as(as = "Hex")]
    pub invalidation_scope: Vec<u8>,
    /// Nonce within the scope.
    pub invalidation_nonce: u64,
    /// Called contract.
    pub address: EthAddress,
    /// Call data.
    #[serde_as(as = "Hex")]
    pub payload: Vec<u8>,
    /// Foreign block height after which the call is void.
    pub timeout: u64,
    /// Tokens transferred to the logic contract.
    pub tokens: Vec<Erc20Token>,
    /// Fees paid to the relayer.
    pub fees: Vec<Erc20Token>,
    /// Host height the call was created at.
    pub height: u64,
}

/// Every outgoing transaction kind the queue carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutgoingTx {
    /// Token batch.
    Batch(BatchTx),
    /// Logic call.
    ContractCall(ContractCallTx),
}

impl OutgoingTx {
    /// Kind discriminator.
    pub fn kind(&self) -> OutgoingTxKind {
        match self {
            OutgoingTx::Batch(_) => OutgoingTxKind::Batch,
            OutgoingTx::ContractCall(_) => OutgoingTxKind::ContractCall,
        }
    }

    /// Store index of this transaction.
    pub fn store_index(&self) -> AttestationResult<StoreIndex> {
        match self {
            OutgoingTx::Batch(batch) => Ok(StoreIndex::batch(
                &batch.token_contract,
                batch.batch_nonce,
            )),
            OutgoingTx::ContractCall(call) => {
                StoreIndex::contract_call(&call.invalidation_scope, call.invalidation_nonce)
            }
        }
    }

    /// Host height the transaction was created at.
    pub fn height(&self) -> u64 {
        match self {
            OutgoingTx::Batch(batch) => batch.height,
            OutgoingTx::ContractCall(call) => call.height,
        }
    }

    /// Structural checks run before the transaction is stored.
    pub fn validate(&self) -> AttestationResult<()> {
        match self {
            OutgoingTx::Batch(batch) => {
                if let Some(tx) = batch
                    .transactions
                    .iter()
                    .find(|tx| tx.erc20_token.contract != batch.token_contract)
                {
                    return Err(AttestationError::integrity(format!(
                        "batch {} for token {} carries send {} of token {}",
                        batch.batch_nonce, batch.token_contract, tx.id, tx.erc20_token.contract
                    )));
                }
                Ok(())
            }
            OutgoingTx::ContractCall(call) => {
                if call.invalidation_scope.len() > u8::MAX as usize {
                    return Err(AttestationError::ScopeTooLong {
                        len: call.invalidation_scope.len(),
                    });
                }
                Ok(())
            }
        }
    }
}

impl From<BatchTx> for OutgoingTx {
    fn from(batch: BatchTx) -> Self {
        OutgoingTx::Batch(batch)
    }
}

impl From<ContractCallTx> for OutgoingTx {
    fn from(call: ContractCallTx) -> Self {
        OutgoingTx::ContractCall(call)
    }
}

/// Validator key delegation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateKeys {
    /// Validator operator address.
    pub validator_address: ValidatorAddress,
    /// Account that signs on the validator's behalf.
    pub orchestrator_address: AccountAddress,
    /// Foreign-chain signing address.
    pub ethereum_address: EthAddress,
}

/// One stored confirmation.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    /// Artifact the signature covers.
    pub store_index: StoreIndex,
    /// Signing validator.
    pub validator: ValidatorAddress,
    /// Opaque signature bytes.
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
}

/// Entire attestation keyspace in typed form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSnapshot {
    /// Signer sets, ascending by nonce.
    pub signer_sets: Vec<SignerSetTx>,
    /// Latest signer set nonce.
    pub latest_signer_set_nonce: u64,
    /// Last slashed signer set nonce.
    pub last_slashed_signer_set_nonce: u64,
    /// Last unbonding block height.
    pub last_unbonding_block_height: u64,
    /// Confirmations in key order.
    pub confirmations: Vec<ConfirmationRecord>,
    /// Outgoing transactions in key order.
    pub outgoing_txs: Vec<OutgoingTx>,
    /// Delegate keys sorted by ethereum address, then validator.
    pub delegate_keys: Vec<DelegateKeys>,
}
