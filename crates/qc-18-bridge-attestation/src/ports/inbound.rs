//! # Inbound Ports
//!
//! API traits defining what the Bridge Attestation subsystem can do.
//!
//! All four are implemented by `BridgeKeeper`. Visitors return `true` to
//! stop iteration early.

use crate::domain::{
    AccountAddress, AttestationResult, DelegateKeys, EthAddress, OutgoingTx, OutgoingTxKind,
    SignerSetTx, StoreIndex, ValidatorAddress,
};
use std::collections::BTreeMap;

/// Signer set persistence, keyed by nonce.
pub trait SignerSetStore {
    /// Store a signer set and advance the latest pointer.
    ///
    /// Rejects a nonce that does not exceed the latest stored nonce.
    fn put_signer_set(&mut self, set: &SignerSetTx) -> AttestationResult<()>;

    /// Store a signer set without the monotonicity check.
    fn put_signer_set_unchecked(&mut self, set: &SignerSetTx) -> AttestationResult<()>;

    /// Signer set by nonce.
    fn signer_set(&self, nonce: u64) -> AttestationResult<Option<SignerSetTx>>;

    /// Whether a signer set with this nonce exists.
    fn has_signer_set(&self, nonce: u64) -> AttestationResult<bool>;

    /// Remove a signer set. The latest pointer is left untouched.
    fn delete_signer_set(&mut self, nonce: u64) -> AttestationResult<()>;

    /// Signer set referenced by the latest pointer.
    fn latest_signer_set(&self) -> AttestationResult<Option<SignerSetTx>>;

    /// Latest signer set nonce, `0` when none was stored.
    fn latest_signer_set_nonce(&self) -> AttestationResult<u64>;

    /// Visit signer sets from the highest nonce down.
    fn iterate_signer_sets(
        &self,
        visitor: &mut dyn FnMut(&SignerSetTx) -> bool,
    ) -> AttestationResult<()>;

    /// All signer sets, highest nonce first.
    fn signer_sets_descending(&self) -> AttestationResult<Vec<SignerSetTx>>;

    /// Sets with `last_slashed < nonce < max_height`, ascending.
    fn unslashed_signer_sets(&self, max_height: u64) -> AttestationResult<Vec<SignerSetTx>>;

    /// Advance the last slashed nonce. Moving it backwards is rejected.
    fn set_last_slashed_signer_set_nonce(&mut self, nonce: u64) -> AttestationResult<()>;

    /// Last slashed signer set nonce, `0` when unset.
    fn last_slashed_signer_set_nonce(&self) -> AttestationResult<u64>;

    /// Advance the last unbonding height. Moving it backwards is rejected.
    fn set_last_unbonding_block_height(&mut self, height: u64) -> AttestationResult<()>;

    /// Last unbonding block height, `0` when unset.
    fn last_unbonding_block_height(&self) -> AttestationResult<u64>;

    /// The newest `count` signer sets, newest first.
    fn recent_signer_sets(&self, count: usize) -> AttestationResult<Vec<SignerSetTx>>;

    /// Signer sets `validator` has not confirmed, newest first.
    fn signer_sets_unsigned_by(
        &self,
        validator: &ValidatorAddress,
    ) -> AttestationResult<Vec<SignerSetTx>>;
}

/// Per-(artifact, validator) signature storage.
///
/// Signatures are opaque; nothing here verifies or counts them.
pub trait ConfirmationLedger {
    /// Store a signature, replacing any earlier one. Returns the store key.
    fn put_confirmation(
        &mut self,
        index: &StoreIndex,
        validator: &ValidatorAddress,
        signature: &[u8],
    ) -> AttestationResult<Vec<u8>>;

    /// Signature of `validator` over the artifact.
    fn confirmation(
        &self,
        index: &StoreIndex,
        validator: &ValidatorAddress,
    ) -> AttestationResult<Option<Vec<u8>>>;

    /// Whether `validator` confirmed the artifact.
    fn has_confirmation(
        &self,
        index: &StoreIndex,
        validator: &ValidatorAddress,
    ) -> AttestationResult<bool>;

    /// Remove one confirmation.
    fn delete_confirmation(
        &mut self,
        index: &StoreIndex,
        validator: &ValidatorAddress,
    ) -> AttestationResult<()>;

    /// Every confirmation of the artifact, by ascending validator bytes.
    fn confirmations_for(
        &self,
        index: &StoreIndex,
    ) -> AttestationResult<BTreeMap<ValidatorAddress, Vec<u8>>>;

    /// Visit confirmations of the artifact in ascending validator order.
    fn iterate_confirmations(
        &self,
        index: &StoreIndex,
        visitor: &mut dyn FnMut(&ValidatorAddress, &[u8]) -> bool,
    ) -> AttestationResult<()>;
}

/// Ordered storage of outgoing transactions of every kind.
pub trait OutgoingTxQueue {
    /// Validate and store a transaction. Returns its store index.
    fn put_outgoing_tx(&mut self, tx: &OutgoingTx) -> AttestationResult<StoreIndex>;

    /// Transaction by store index.
    fn outgoing_tx(&self, index: &StoreIndex) -> AttestationResult<Option<OutgoingTx>>;

    /// Whether a transaction exists at the store index.
    fn has_outgoing_tx(&self, index: &StoreIndex) -> AttestationResult<bool>;

    /// Remove a transaction.
    fn delete_outgoing_tx(&mut self, index: &StoreIndex) -> AttestationResult<()>;

    /// Visit transactions of one kind in descending store-index order.
    fn iterate_outgoing_txs(
        &self,
        kind: OutgoingTxKind,
        visitor: &mut dyn FnMut(&StoreIndex, &OutgoingTx) -> bool,
    ) -> AttestationResult<()>;

    /// Up to `limit` transactions of one kind, descending.
    fn outgoing_txs_by_kind(
        &self,
        kind: OutgoingTxKind,
        limit: usize,
    ) -> AttestationResult<Vec<OutgoingTx>>;

    /// Transactions of one kind `validator` has not confirmed, descending.
    fn outgoing_txs_unsigned_by(
        &self,
        kind: OutgoingTxKind,
        validator: &ValidatorAddress,
    ) -> AttestationResult<Vec<OutgoingTx>>;
}

/// Orchestrator and foreign-address indices.
pub trait DelegationRegistry {
    /// Map an orchestrator account to its validator.
    fn set_orchestrator_validator(
        &mut self,
        validator: &ValidatorAddress,
        orchestrator: &AccountAddress,
    ) -> AttestationResult<()>;

    /// Validator an orchestrator signs for.
    fn orchestrator_validator(
        &self,
        orchestrator: &AccountAddress,
    ) -> AttestationResult<Option<ValidatorAddress>>;

    /// Record a validator's foreign-chain address.
    fn set_ethereum_address(
        &mut self,
        validator: &ValidatorAddress,
        address: &EthAddress,
    ) -> AttestationResult<()>;

    /// Foreign-chain address of a validator.
    fn ethereum_address(&self, validator: &ValidatorAddress)
        -> AttestationResult<Option<EthAddress>>;

    /// All delegations, sorted by ethereum address bytes then validator.
    ///
    /// Fails when a validator with a foreign address has no orchestrator.
    fn delegate_keys(&self) -> AttestationResult<Vec<DelegateKeys>>;

    /// Write both indices for every entry.
    fn import_delegate_keys(&mut self, keys: &[DelegateKeys]) -> AttestationResult<()>;
}
