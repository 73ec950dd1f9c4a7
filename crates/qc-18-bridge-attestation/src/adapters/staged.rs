//! # Staged Store
//!
//! Buffers the writes of one state transition on top of another store.
//!
//! Reads see staged writes. `commit` applies them through a single
//! `atomic_batch_write`; dropping the store or calling `discard` throws
//! them away, so a failed step leaves the underlying store untouched.

use crate::domain::errors::KVStoreError;
use crate::domain::keys::KeyRange;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanOrder, ScanResult};
use std::collections::BTreeMap;

/// Write overlay over a borrowed store.
pub struct StagedStore<'a, KV: KeyValueStore> {
    inner: &'a mut KV,
    /// `None` marks a staged delete.
    overlay: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, KV: KeyValueStore> StagedStore<'a, KV> {
    /// Start staging on top of `inner`.
    pub fn new(inner: &'a mut KV) -> Self {
        Self {
            inner,
            overlay: BTreeMap::new(),
        }
    }

    /// Number of keys with a staged write.
    pub fn pending(&self) -> usize {
        self.overlay.len()
    }

    /// Apply every staged write atomically.
    pub fn commit(self) -> Result<(), KVStoreError> {
        let operations: Vec<BatchOperation> = self
            .overlay
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::put(key, value),
                None => BatchOperation::delete(key),
            })
            .collect();
        if operations.is_empty() {
            return Ok(());
        }
        tracing::debug!("[qc-18] committing {} staged writes", operations.len());
        self.inner.atomic_batch_write(operations)
    }

    /// Drop every staged write.
    pub fn discard(self) {
        tracing::debug!("[qc-18] discarding {} staged writes", self.overlay.len());
    }
}

impl<KV: KeyValueStore> KeyValueStore for StagedStore<'_, KV> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        match self.overlay.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.inner.get(key),
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.overlay.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.overlay.insert(key.to_vec(), None);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.overlay.insert(key, Some(value));
                }
                BatchOperation::Delete { key } => {
                    self.overlay.insert(key, None);
                }
            }
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        match self.overlay.get(key) {
            Some(staged) => Ok(staged.is_some()),
            None => self.inner.exists(key),
        }
    }

    fn range_scan(&self, range: &KeyRange, order: ScanOrder) -> Result<ScanResult, KVStoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .inner
            .range_scan(range, ScanOrder::Ascending)?
            .into_iter()
            .collect();
        for (key, staged) in &self.overlay {
            if !range.contains(key) {
                continue;
            }
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        let iter = merged.into_iter();
        Ok(match order {
            ScanOrder::Ascending => iter.collect(),
            ScanOrder::Descending => iter.rev().collect(),
        })
    }
}
