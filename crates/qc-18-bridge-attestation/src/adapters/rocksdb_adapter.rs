//! # RocksDB Storage Adapter
//!
//! Persistent `KeyValueStore` for the attestation keyspace.
//!
//! RocksDB's default comparator orders keys bytewise, which is exactly the
//! order every scan in this crate relies on.

use crate::domain::errors::KVStoreError;
use crate::domain::keys::KeyRange;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanOrder, ScanResult};
use parking_lot::RwLock;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// RocksDB configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 32MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/bridge-attestation".to_string(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 32 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store.
pub struct RocksDbStore {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

fn io_error(op: &str, e: rocksdb::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: format!("RocksDB {} failed: {}", op, e),
    }
}

impl RocksDbStore {
    /// Open or create a database.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| KVStoreError::IOError {
            message: format!("Failed to open RocksDB: {}", e),
        })?;
        tracing::info!("[qc-18] opened RocksDB store at {}", config.path);

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    /// Open with default tuning at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db.read().get(key).map_err(|e| io_error("get", e))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let write_opts = self.write_options();
        self.db
            .write()
            .put_opt(key, value, &write_opts)
            .map_err(|e| io_error("put", e))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        let write_opts = self.write_options();
        self.db
            .write()
            .delete_opt(key, &write_opts)
            .map_err(|e| io_error("delete", e))
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(&key, &value),
                BatchOperation::Delete { key } => batch.delete(&key),
            }
        }
        let write_opts = self.write_options();
        self.db
            .write()
            .write_opt(batch, &write_opts)
            .map_err(|e| io_error("batch write", e))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.db
            .read()
            .get_pinned(key)
            .map(|v| v.is_some())
            .map_err(|e| io_error("exists check", e))
    }

    fn range_scan(&self, range: &KeyRange, order: ScanOrder) -> Result<ScanResult, KVStoreError> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let db = self.db.read();
        let mode = match (order, &range.start, &range.end) {
            (ScanOrder::Ascending, Some(start), _) => IteratorMode::From(start, Direction::Forward),
            (ScanOrder::Ascending, None, _) => IteratorMode::Start,
            (ScanOrder::Descending, _, Some(end)) => IteratorMode::From(end, Direction::Reverse),
            (ScanOrder::Descending, _, None) => IteratorMode::End,
        };

        let mut results = Vec::new();
        for item in db.iterator(mode) {
            let (key, value) = item.map_err(|e| io_error("scan", e))?;
            if range.contains(&key) {
                results.push((key.to_vec(), value.to_vec()));
                continue;
            }
            // Reverse seek lands on the exclusive end itself
            let before_start = range.start.as_deref().is_some_and(|s| &key[..] < s);
            let past_end = range.end.as_deref().is_some_and(|e| &key[..] >= e);
            match order {
                ScanOrder::Ascending if past_end => break,
                ScanOrder::Descending if before_start => break,
                _ => continue,
            }
        }
        Ok(results)
    }
}
