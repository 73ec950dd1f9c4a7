//! # Adapters Layer
//!
//! Implementations of the outbound ports.

pub mod events;
pub mod memory;
pub mod power;
#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;
pub mod staged;

pub use events::{RecordingEventSink, TracingEventSink};
pub use memory::InMemoryKVStore;
pub use power::StaticPowerSource;
#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};
pub use staged::StagedStore;
