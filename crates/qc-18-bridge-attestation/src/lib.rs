//! # QC-18 Bridge Attestation
//!
//! Attestation core of the Ethereum bridge.
//!
//! **Subsystem ID:** 18
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//! **Execution:** Single-threaded, synchronous, deterministic
//!
//! ## Purpose
//!
//! - Turn the validator power table into normalized, versioned signer sets
//! - Collect per-validator signatures over signer sets and outgoing transactions
//! - Queue outgoing transactions of several kinds behind one storage path
//!
//! ## Determinism
//!
//! | Concern | Rule |
//! |---------|------|
//! | Power normalization | Exact `u128` integer math, no floating point |
//! | Iteration | Raw key byte order only (`BTreeMap`, bytewise stores) |
//! | Numeric keys | Big-endian, so byte order equals numeric order |
//! | Store indices | Prefix-free across every artifact kind |
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-bridge-attestation/
//! ├── domain/          # Signer sets, outgoing txs, addresses, keys, errors
//! ├── algorithms/      # Power normalization
//! ├── codec/           # bincode records, outgoing tx kind registry
//! ├── ports/           # SignerSetStore, ConfirmationLedger, OutgoingTxQueue, KeyValueStore
//! ├── adapters/        # In-memory, staged and RocksDB stores; power/event adapters
//! └── service/         # BridgeKeeper
//! ```
//!
//! ## Example
//!
//! ```
//! use qc_18_bridge_attestation::{
//!     AttestationConfig, BridgeKeeper, SignerSetStore, StaticPowerSource, ValidatorAddress,
//! };
//!
//! let source = StaticPowerSource::default()
//!     .with_validator(ValidatorAddress::new(vec![1]), 100)
//!     .with_validator(ValidatorAddress::new(vec![2]), 50);
//! let mut keeper = BridgeKeeper::new_in_memory(source, AttestationConfig::default());
//!
//! let set = keeper.create_signer_set_request(10).unwrap();
//! assert_eq!(keeper.latest_signer_set_nonce().unwrap(), set.nonce);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod codec;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    InMemoryKVStore, RecordingEventSink, StagedStore, StaticPowerSource, TracingEventSink,
};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use algorithms::{build_signer_set, normalize_power, MAX_NORMALIZED_POWER};
pub use codec::{decode_unbonding_validators, encode_unbonding_validators, KindRegistry};
pub use config::{AttestationConfig, BridgeParams};
pub use domain::{
    prefix_upper_bound, u64_from_be_bytes, u64_to_be_bytes, AccountAddress, AttestationError,
    AttestationEvent, AttestationResult, BatchTx, BridgeSnapshot, ConfirmationRecord,
    ContractCallTx, DelegateKeys, Erc20Token, EthAddress, EthereumSigner, KVStoreError, KeyPrefix,
    KeyRange, OutgoingTx, OutgoingTxKind, SendToEthereum, SignerSetTx, StoreIndex,
    ValidatorAddress, ValidatorPower,
};
pub use ports::{
    BatchOperation, ConfirmationLedger, DelegationRegistry, EventSink, KeyValueStore,
    OutgoingTxQueue, PowerSource, ScanOrder, SignerSetStore,
};
pub use service::{BridgeDependencies, BridgeKeeper};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
