//! # Domain Errors
//!
//! Error types for Bridge Attestation.
//!
//! Absent records are not errors: lookups return `Option` and scalar
//! counters read as `0`. Integrity and decode errors indicate store
//! corruption or a protocol mismatch and must unwind the enclosing step.

use thiserror::Error;

/// Key-value store adapter errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError {
        /// Adapter message
        message: String,
    },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError {
        /// Adapter message
        message: String,
    },
}

/// Bridge attestation error types.
#[derive(Debug, Error)]
pub enum AttestationError {
    /// Normalizing an empty or zero-power validator set.
    #[error("cannot build signer set: zero total power")]
    ZeroTotalPower,

    /// Signer set nonce does not advance past the latest stored nonce.
    #[error("Signer set nonce regression: nonce {nonce} <= latest {latest}")]
    NonceRegression {
        /// Rejected nonce
        nonce: u64,
        /// Latest stored nonce
        latest: u64,
    },

    /// Monotonic scalar counter would move backwards.
    #[error("Counter {counter} regression: current {current}, requested {requested}")]
    CounterRegression {
        /// Counter name
        counter: &'static str,
        /// Stored value
        current: u64,
        /// Rejected value
        requested: u64,
    },

    /// Store indices are inconsistent with each other.
    #[error("Integrity violation: {reason}")]
    IntegrityViolation {
        /// What was found inconsistent
        reason: String,
    },

    /// Stored bytes could not be decoded.
    #[error("Failed to decode {what}: {reason}")]
    Decode {
        /// Record being decoded
        what: &'static str,
        /// Codec message
        reason: String,
    },

    /// Value could not be encoded.
    #[error("Failed to encode {what}: {reason}")]
    Encode {
        /// Record being encoded
        what: &'static str,
        /// Codec message
        reason: String,
    },

    /// Outgoing tx discriminator with no registered codec.
    #[error("Unknown outgoing tx kind: 0x{0:02x}")]
    UnknownTxKind(u8),

    /// Malformed store key.
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },

    /// Ethereum address is not 20 hex-encoded bytes.
    #[error("Invalid ethereum address: {0}")]
    InvalidEthAddress(String),

    /// Contract call invalidation scope does not fit its one-byte length prefix.
    #[error("Invalidation scope too long: {len} bytes (max 255)")]
    ScopeTooLong {
        /// Scope length in bytes
        len: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Key-value store failure.
    #[error(transparent)]
    Store(#[from] KVStoreError),
}

impl AttestationError {
    /// Build an integrity violation.
    pub fn integrity(reason: impl Into<String>) -> Self {
        Self::IntegrityViolation {
            reason: reason.into(),
        }
    }

    /// Build a decode error.
    pub fn decode(what: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            what,
            reason: reason.to_string(),
        }
    }

    /// Build an encode error.
    pub fn encode(what: &'static str, reason: impl ToString) -> Self {
        Self::Encode {
            what,
            reason: reason.to_string(),
        }
    }

    /// Whether the error means the store is corrupt or speaks another protocol.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::IntegrityViolation { .. }
                | Self::Decode { .. }
                | Self::UnknownTxKind(_)
                | Self::InvalidKey { .. }
                | Self::Store(KVStoreError::CorruptionError { .. })
        )
    }
}

/// Result type for attestation operations.
pub type AttestationResult<T> = Result<T, AttestationError>;
