//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the attestation core requires the host to provide.

use crate::domain::errors::{AttestationResult, KVStoreError};
use crate::domain::events::AttestationEvent;
use crate::domain::keys::KeyRange;
use crate::domain::entities::ValidatorPower;

/// Ordered key/value pairs returned by a scan.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Direction of a range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// Ascending raw key bytes.
    Ascending,
    /// Descending raw key bytes.
    Descending,
}

/// Abstract interface for key-value database operations.
///
/// Keys are compared as raw bytes. Scans must return keys in exactly that
/// order (or its reverse) so every node observes the same sequence.
///
/// Production: `RocksDbStore` (feature `rocksdb`)
/// Testing: `InMemoryKVStore`
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either all operations are applied, in order, or none are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// All pairs with keys inside `range`, in the given order.
    fn range_scan(&self, range: &KeyRange, order: ScanOrder) -> Result<ScanResult, KVStoreError>;

    /// All pairs whose key starts with `prefix`, ascending.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        self.range_scan(&KeyRange::prefix(prefix), ScanOrder::Ascending)
    }
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put {
        /// Key
        key: Vec<u8>,
        /// Value
        value: Vec<u8>,
    },
    /// Delete a key.
    Delete {
        /// Key
        key: Vec<u8>,
    },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    /// Key the operation touches.
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// Source of current validator power.
///
/// Implemented by the host's staking module.
pub trait PowerSource: Send + Sync {
    /// Bonded validators and their power, in a deterministic order.
    fn validator_powers(&self) -> AttestationResult<Vec<ValidatorPower>>;
}

/// Sink for attestation events.
pub trait EventSink: Send + Sync {
    /// Emit one event.
    fn emit(&mut self, event: AttestationEvent);
}
