//! In-memory key-value store.

use crate::domain::errors::KVStoreError;
use crate::domain::keys::KeyRange;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanOrder, ScanResult};
use std::collections::BTreeMap;
use std::ops::Bound;

/// In-memory key-value store for unit tests and tooling.
///
/// Backed by a `BTreeMap`, so scans come out in raw byte order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn btree_range<'a>(
    data: &'a BTreeMap<Vec<u8>, Vec<u8>>,
    range: &KeyRange,
) -> impl DoubleEndedIterator<Item = (&'a Vec<u8>, &'a Vec<u8>)> {
    // BTreeMap::range panics on inverted bounds
    let bounds = if range.is_empty() {
        (Bound::Included(Vec::new()), Bound::Excluded(Vec::new()))
    } else {
        (
            range
                .start
                .clone()
                .map_or(Bound::Unbounded, Bound::Included),
            range.end.clone().map_or(Bound::Unbounded, Bound::Excluded),
        )
    };
    data.range::<Vec<u8>, _>(bounds)
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.remove(key);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        // Single-threaded map: applying in order is atomic
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn range_scan(&self, range: &KeyRange, order: ScanOrder) -> Result<ScanResult, KVStoreError> {
        let iter = btree_range(&self.data, range).map(|(k, v)| (k.clone(), v.clone()));
        Ok(match order {
            ScanOrder::Ascending => iter.collect(),
            ScanOrder::Descending => iter.rev().collect(),
        })
    }
}
