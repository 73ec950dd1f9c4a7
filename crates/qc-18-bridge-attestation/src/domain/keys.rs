//! # Key Space
//!
//! Named key prefixes, the big-endian numeric key codec and prefix ranges.
//!
//! Every persisted key starts with one `KeyPrefix` byte. Numeric key parts
//! are big-endian so that ascending byte order equals ascending numeric
//! order, which keeps every scan deterministic across nodes.
//!
//! | Prefix | Key suffix | Value |
//! |--------|------------|-------|
//! | `0x01` | BE nonce | SignerSetTx |
//! | `0x02` | - | latest signer set nonce |
//! | `0x03` | - | last slashed signer set nonce |
//! | `0x04` | - | last unbonding block height |
//! | `0x05` | store index ‖ validator | signature |
//! | `0x06` | orchestrator | validator |
//! | `0x07` | validator | ethereum address |
//! | `0x08` | kind ‖ kind key | outgoing tx envelope |

use super::errors::{AttestationError, AttestationResult};

/// Key prefixes for the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyPrefix {
    /// Signer set record: `0x01 ‖ BE(nonce)` -> SignerSetTx
    SignerSetTx,
    /// Latest signer set nonce scalar
    LatestSignerSetNonce,
    /// Last slashed signer set nonce scalar
    LastSlashedSignerSetNonce,
    /// Last unbonding block height scalar
    LastUnbondingBlockHeight,
    /// Confirmation: `0x05 ‖ store index ‖ validator` -> signature
    EthereumSignature,
    /// Orchestrator index: `0x06 ‖ orchestrator` -> validator
    OrchestratorValidator,
    /// Foreign address index: `0x07 ‖ validator` -> ethereum address
    ValidatorEthereumAddress,
    /// Outgoing tx record: `0x08 ‖ store index` -> envelope
    OutgoingTx,
}

impl KeyPrefix {
    /// Get the prefix byte.
    pub const fn as_byte(self) -> u8 {
        match self {
            KeyPrefix::SignerSetTx => 0x01,
            KeyPrefix::LatestSignerSetNonce => 0x02,
            KeyPrefix::LastSlashedSignerSetNonce => 0x03,
            KeyPrefix::LastUnbondingBlockHeight => 0x04,
            KeyPrefix::EthereumSignature => 0x05,
            KeyPrefix::OrchestratorValidator => 0x06,
            KeyPrefix::ValidatorEthereumAddress => 0x07,
            KeyPrefix::OutgoingTx => 0x08,
        }
    }

    /// Build a full key from parts appended after the prefix byte.
    pub fn key(self, parts: &[&[u8]]) -> Vec<u8> {
        let len = 1 + parts.iter().map(|p| p.len()).sum::<usize>();
        let mut key = Vec::with_capacity(len);
        key.push(self.as_byte());
        for part in parts {
            key.extend_from_slice(part);
        }
        key
    }

    /// Key of a scalar stored directly under the prefix.
    pub fn scalar_key(self) -> Vec<u8> {
        vec![self.as_byte()]
    }

    /// Range covering every key under this prefix.
    pub fn range(self) -> KeyRange {
        KeyRange::prefix(&[self.as_byte()])
    }
}

/// Encode a number as an 8-byte big-endian key part.
pub const fn u64_to_be_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decode an 8-byte big-endian key part.
pub fn u64_from_be_bytes(bytes: &[u8]) -> AttestationResult<u64> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| AttestationError::InvalidKey {
            reason: format!("expected 8 big-endian bytes, got {}", bytes.len()),
        })?;
    Ok(u64::from_be_bytes(array))
}

/// Exclusive upper bound of all keys starting with `prefix`.
///
/// Increments the last byte, carrying into preceding bytes on overflow.
/// Returns `None` when no finite bound exists: the prefix is empty or
/// consists only of `0xFF` bytes.
///
/// ```
/// use qc_18_bridge_attestation::domain::keys::prefix_upper_bound;
///
/// assert_eq!(prefix_upper_bound(&[1, 3, 4]), Some(vec![1, 3, 5]));
/// assert_eq!(prefix_upper_bound(&[15, 42, 255, 255]), Some(vec![15, 43, 0, 0]));
/// assert_eq!(prefix_upper_bound(&[255, 255, 255, 255]), None);
/// ```
pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    for i in (0..end.len()).rev() {
        if end[i] == u8::MAX {
            end[i] = 0;
        } else {
            end[i] += 1;
            return Some(end);
        }
    }
    None
}

/// Half-open key range `[start, end)`. `None` means unbounded on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRange {
    /// Inclusive lower bound.
    pub start: Option<Vec<u8>>,
    /// Exclusive upper bound.
    pub end: Option<Vec<u8>>,
}

impl KeyRange {
    /// Range between two bounds.
    pub fn new(start: Option<Vec<u8>>, end: Option<Vec<u8>>) -> Self {
        Self { start, end }
    }

    /// The whole keyspace.
    pub fn full() -> Self {
        Self::default()
    }

    /// Every key starting with `prefix`. An empty prefix is the whole keyspace.
    pub fn prefix(prefix: &[u8]) -> Self {
        if prefix.is_empty() {
            return Self::full();
        }
        Self {
            start: Some(prefix.to_vec()),
            end: prefix_upper_bound(prefix),
        }
    }

    /// Check whether `key` falls inside the range.
    pub fn contains(&self, key: &[u8]) -> bool {
        let above_start = self.start.as_deref().map_or(true, |s| key >= s);
        let below_end = self.end.as_deref().map_or(true, |e| key < e);
        above_start && below_end
    }

    /// True when no key can satisfy both bounds.
    pub fn is_empty(&self) -> bool {
        matches!((&self.start, &self.end), (Some(s), Some(e)) if s >= e)
    }
}

/// Key of a signer set record.
pub fn signer_set_key(nonce: u64) -> Vec<u8> {
    KeyPrefix::SignerSetTx.key(&[&u64_to_be_bytes(nonce)])
}

/// Key of one confirmation.
pub fn ethereum_signature_key(store_index: &[u8], validator: &[u8]) -> Vec<u8> {
    KeyPrefix::EthereumSignature.key(&[store_index, validator])
}

/// Prefix shared by every confirmation of one artifact.
pub fn ethereum_signature_prefix(store_index: &[u8]) -> Vec<u8> {
    KeyPrefix::EthereumSignature.key(&[store_index])
}

/// Key of the orchestrator -> validator index.
pub fn orchestrator_validator_key(orchestrator: &[u8]) -> Vec<u8> {
    KeyPrefix::OrchestratorValidator.key(&[orchestrator])
}

/// Key of the validator -> ethereum address index.
pub fn ethereum_address_key(validator: &[u8]) -> Vec<u8> {
    KeyPrefix::ValidatorEthereumAddress.key(&[validator])
}

/// Key of an outgoing tx record.
pub fn outgoing_tx_key(store_index: &[u8]) -> Vec<u8> {
    KeyPrefix::OutgoingTx.key(&[store_index])
}

/// Strip the one-byte prefix from a key of the given type.
pub fn strip_prefix(prefix: KeyPrefix, key: &[u8]) -> AttestationResult<&[u8]> {
    match key.split_first() {
        Some((first, rest)) if *first == prefix.as_byte() => Ok(rest),
        _ => Err(AttestationError::InvalidKey {
            reason: format!("key does not start with {:?} prefix", prefix),
        }),
    }
}
