//! # State Snapshot
//!
//! Export and import of the whole attestation keyspace.

use super::*;
use crate::codec::encode_record;
use crate::domain::keys::{
    ethereum_signature_key, outgoing_tx_key, signer_set_key, strip_prefix, u64_to_be_bytes,
};
use crate::domain::{
    AttestationError, AttestationResult, BridgeSnapshot, ConfirmationRecord, KeyPrefix,
    StoreIndex, ValidatorAddress,
};
use crate::ports::inbound::{DelegationRegistry, SignerSetStore};
use crate::ports::outbound::{BatchOperation, ScanOrder};

use super::delegation::delegate_key_operations;

impl<KV, PS, ES> BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    /// Export every record as a typed snapshot.
    pub fn export_state(&self) -> AttestationResult<BridgeSnapshot> {
        let mut signer_sets = Vec::new();
        self.for_each_signer_set(
            &KeyPrefix::SignerSetTx.range(),
            ScanOrder::Ascending,
            &mut |set| {
                signer_sets.push(set);
                Ok(false)
            },
        )?;

        let mut confirmations = Vec::new();
        for (key, signature) in self
            .store
            .prefix_scan(&KeyPrefix::EthereumSignature.scalar_key())?
        {
            let rest = strip_prefix(KeyPrefix::EthereumSignature, &key)?;
            let (store_index, validator) = StoreIndex::split_prefix(rest)?;
            if validator.is_empty() {
                return Err(AttestationError::integrity(format!(
                    "confirmation of {} without validator",
                    store_index
                )));
            }
            confirmations.push(ConfirmationRecord {
                store_index,
                validator: ValidatorAddress::new(validator),
                signature,
            });
        }

        let mut outgoing_txs = Vec::new();
        for (key, value) in self
            .store
            .prefix_scan(&KeyPrefix::OutgoingTx.scalar_key())?
        {
            let index = Self::exact_store_index(strip_prefix(KeyPrefix::OutgoingTx, &key)?)?;
            outgoing_txs.push(self.decode_outgoing_entry(&index, &value)?);
        }

        let snapshot = BridgeSnapshot {
            signer_sets,
            latest_signer_set_nonce: self.latest_signer_set_nonce()?,
            last_slashed_signer_set_nonce: self.last_slashed_signer_set_nonce()?,
            last_unbonding_block_height: self.last_unbonding_block_height()?,
            confirmations,
            outgoing_txs,
            delegate_keys: self.delegate_keys()?,
        };
        tracing::debug!(
            "[qc-18] exported {} signer sets, {} confirmations, {} outgoing txs",
            snapshot.signer_sets.len(),
            snapshot.confirmations.len(),
            snapshot.outgoing_txs.len()
        );
        Ok(snapshot)
    }

    /// Write a snapshot in one atomic batch.
    ///
    /// Counters are taken from the snapshot as-is. Nothing is emitted.
    pub fn import_state(&mut self, snapshot: &BridgeSnapshot) -> AttestationResult<()> {
        let delegations = delegate_key_operations(&snapshot.delegate_keys)?;
        let mut operations = Vec::new();

        for set in &snapshot.signer_sets {
            operations.push(BatchOperation::put(
                signer_set_key(set.nonce),
                encode_record("signer set", set)?,
            ));
        }
        for (prefix, value) in [
            (
                KeyPrefix::LatestSignerSetNonce,
                snapshot.latest_signer_set_nonce,
            ),
            (
                KeyPrefix::LastSlashedSignerSetNonce,
                snapshot.last_slashed_signer_set_nonce,
            ),
            (
                KeyPrefix::LastUnbondingBlockHeight,
                snapshot.last_unbonding_block_height,
            ),
        ] {
            operations.push(BatchOperation::put(
                prefix.scalar_key(),
                u64_to_be_bytes(value).to_vec(),
            ));
        }
        for record in &snapshot.confirmations {
            operations.push(BatchOperation::put(
                ethereum_signature_key(record.store_index.as_bytes(), record.validator.as_bytes()),
                record.signature.clone(),
            ));
        }
        for tx in &snapshot.outgoing_txs {
            tx.validate()?;
            let index = tx.store_index()?;
            operations.push(BatchOperation::put(
                outgoing_tx_key(index.as_bytes()),
                self.registry.pack(tx)?,
            ));
        }

        operations.extend(delegations);

        self.store.atomic_batch_write(operations)?;
        tracing::info!(
            "[qc-18] imported snapshot: {} signer sets, latest #{}",
            snapshot.signer_sets.len(),
            snapshot.latest_signer_set_nonce
        );
        Ok(())
    }
}
