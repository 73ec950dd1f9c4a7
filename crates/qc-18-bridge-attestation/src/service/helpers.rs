//! # Bridge Keeper - Helper Methods
//!
//! Scalar counters and scan decoding shared by the port implementations.

use super::*;
use crate::codec::decode_record;
use crate::domain::keys::{strip_prefix, u64_from_be_bytes, u64_to_be_bytes};
use crate::domain::{AttestationError, AttestationResult, KeyPrefix, KeyRange, SignerSetTx, StoreIndex};
use crate::ports::outbound::ScanOrder;

impl<KV, PS, ES> BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    /// Read a big-endian scalar; absent reads as `0`.
    pub(crate) fn read_counter(&self, prefix: KeyPrefix) -> AttestationResult<u64> {
        match self.store.get(&prefix.scalar_key())? {
            Some(bytes) => u64_from_be_bytes(&bytes).map_err(|_| {
                AttestationError::decode("counter", format!("{:?} is not 8 bytes", prefix))
            }),
            None => Ok(0),
        }
    }

    /// Advance a monotonic scalar. Equal values are accepted.
    pub(crate) fn advance_counter(
        &mut self,
        prefix: KeyPrefix,
        counter: &'static str,
        value: u64,
    ) -> AttestationResult<()> {
        let current = self.read_counter(prefix)?;
        if value < current {
            return Err(AttestationError::CounterRegression {
                counter,
                current,
                requested: value,
            });
        }
        self.store
            .put(&prefix.scalar_key(), &u64_to_be_bytes(value))?;
        Ok(())
    }

    /// Decode one signer set scan entry, checking key and record agree.
    pub(crate) fn decode_signer_set_entry(
        key: &[u8],
        value: &[u8],
    ) -> AttestationResult<SignerSetTx> {
        let key_nonce = u64_from_be_bytes(strip_prefix(KeyPrefix::SignerSetTx, key)?)?;
        let set: SignerSetTx = decode_record("signer set", value)?;
        if set.nonce != key_nonce {
            tracing::error!(
                "[qc-18] signer set stored under nonce {} claims nonce {}",
                key_nonce,
                set.nonce
            );
            return Err(AttestationError::integrity(format!(
                "signer set under nonce {} has nonce {}",
                key_nonce, set.nonce
            )));
        }
        Ok(set)
    }

    /// Visit decoded signer sets inside `range`. Stops when `visit` returns `true`.
    pub(crate) fn for_each_signer_set(
        &self,
        range: &KeyRange,
        order: ScanOrder,
        visit: &mut dyn FnMut(SignerSetTx) -> AttestationResult<bool>,
    ) -> AttestationResult<()> {
        for (key, value) in self.store.range_scan(range, order)? {
            let set = Self::decode_signer_set_entry(&key, &value)?;
            if visit(set)? {
                break;
            }
        }
        Ok(())
    }

    /// Parse a key suffix that must be exactly one store index.
    pub(crate) fn exact_store_index(bytes: &[u8]) -> AttestationResult<StoreIndex> {
        let (index, rest) = StoreIndex::split_prefix(bytes)?;
        if !rest.is_empty() {
            return Err(AttestationError::integrity(format!(
                "{} trailing bytes after store index {}",
                rest.len(),
                index
            )));
        }
        Ok(index)
    }
}
