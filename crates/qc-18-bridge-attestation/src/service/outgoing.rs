//! # Outgoing Tx Queue Implementation
//!
//! Transactions of every kind share one keyspace:
//! `0x08 ‖ kind byte ‖ kind key`. Scanning `0x08 ‖ kind byte` in reverse
//! yields one kind in descending store-index order.

use super::*;
use crate::domain::keys::{outgoing_tx_key, strip_prefix};
use crate::domain::{
    AttestationError, AttestationEvent, AttestationResult, KeyPrefix, KeyRange, OutgoingTx,
    OutgoingTxKind, StoreIndex, ValidatorAddress,
};
use crate::ports::inbound::{ConfirmationLedger, OutgoingTxQueue};
use crate::ports::outbound::ScanOrder;

impl<KV, PS, ES> BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    /// Decode a stored envelope and check it matches the index it sits under.
    pub(crate) fn decode_outgoing_entry(
        &self,
        index: &StoreIndex,
        bytes: &[u8],
    ) -> AttestationResult<OutgoingTx> {
        let tx = self.registry.unpack(bytes)?;
        let stored_under = tx.store_index()?;
        if &stored_under != index {
            tracing::error!(
                "[qc-18] outgoing tx under {} decodes to index {}",
                index,
                stored_under
            );
            return Err(AttestationError::integrity(format!(
                "outgoing tx under {} belongs at {}",
                index, stored_under
            )));
        }
        Ok(tx)
    }

    /// Visit decoded outgoing txs of one kind in descending index order.
    fn for_each_outgoing_tx(
        &self,
        kind: OutgoingTxKind,
        visit: &mut dyn FnMut(StoreIndex, OutgoingTx) -> AttestationResult<bool>,
    ) -> AttestationResult<()> {
        let range = KeyRange::prefix(&[KeyPrefix::OutgoingTx.as_byte(), kind.as_byte()]);
        for (key, value) in self.store.range_scan(&range, ScanOrder::Descending)? {
            let index = Self::exact_store_index(strip_prefix(KeyPrefix::OutgoingTx, &key)?)?;
            let tx = self.decode_outgoing_entry(&index, &value)?;
            if visit(index, tx)? {
                break;
            }
        }
        Ok(())
    }
}

impl<KV, PS, ES> OutgoingTxQueue for BridgeKeeper<KV, PS, ES>
where
    KV: KeyValueStore,
    PS: PowerSource,
    ES: EventSink,
{
    fn put_outgoing_tx(&mut self, tx: &OutgoingTx) -> AttestationResult<StoreIndex> {
        tx.validate()?;
        let index = tx.store_index()?;
        let key = outgoing_tx_key(index.as_bytes());
        if self.store.exists(&key)? {
            tracing::warn!("[qc-18] outgoing tx {} already stored", index);
            return Err(AttestationError::integrity(format!(
                "outgoing tx {} already stored",
                index
            )));
        }
        let envelope = self.registry.pack(tx)?;
        self.store.put(&key, &envelope)?;

        self.events.emit(AttestationEvent::OutgoingTxQueued {
            kind: tx.kind(),
            store_index: index.clone(),
        });
        tracing::info!("[qc-18] queued {} tx {}", tx.kind().name(), index);
        Ok(index)
    }

    fn outgoing_tx(&self, index: &StoreIndex) -> AttestationResult<Option<OutgoingTx>> {
        match self.store.get(&outgoing_tx_key(index.as_bytes()))? {
            Some(bytes) => Ok(Some(self.decode_outgoing_entry(index, &bytes)?)),
            None => Ok(None),
        }
    }

    fn has_outgoing_tx(&self, index: &StoreIndex) -> AttestationResult<bool> {
        Ok(self.store.exists(&outgoing_tx_key(index.as_bytes()))?)
    }

    fn delete_outgoing_tx(&mut self, index: &StoreIndex) -> AttestationResult<()> {
        self.store.delete(&outgoing_tx_key(index.as_bytes()))?;
        tracing::info!("[qc-18] deleted outgoing tx {}", index);
        Ok(())
    }

    fn iterate_outgoing_txs(
        &self,
        kind: OutgoingTxKind,
        visitor: &mut dyn FnMut(&StoreIndex, &OutgoingTx) -> bool,
    ) -> AttestationResult<()> {
        self.for_each_outgoing_tx(kind, &mut |index, tx| Ok(visitor(&index, &tx)))
    }

    fn outgoing_txs_by_kind(
        &self,
        kind: OutgoingTxKind,
        limit: usize,
    ) -> AttestationResult<Vec<OutgoingTx>> {
        let mut txs = Vec::new();
        if limit == 0 {
            return Ok(txs);
        }
        self.for_each_outgoing_tx(kind, &mut |_, tx| {
            txs.push(tx);
            Ok(txs.len() >= limit)
        })?;
        tracing::debug!("[qc-18] listed {} {} txs", txs.len(), kind.name());
        Ok(txs)
    }

    fn outgoing_txs_unsigned_by(
        &self,
        kind: OutgoingTxKind,
        validator: &ValidatorAddress,
    ) -> AttestationResult<Vec<OutgoingTx>> {
        let limit = self.config.outgoing_query_limit;
        let mut unsigned = Vec::new();
        if limit == 0 {
            return Ok(unsigned);
        }
        self.for_each_outgoing_tx(kind, &mut |index, tx| {
            if !self.has_confirmation(&index, validator)? {
                unsigned.push(tx);
            }
            Ok(unsigned.len() >= limit)
        })?;
        Ok(unsigned)
    }
}
