//! # Domain Value Objects
//!
//! Addresses, outgoing tx kinds and store indices.

use super::errors::{AttestationError, AttestationResult};
use super::keys::u64_to_be_bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{hex::Hex, serde_as, DeserializeAs};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Host-chain validator operator address.
///
/// Ordered by raw bytes, which is the order confirmations are listed in.
#[serde_as]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidatorAddress(#[serde_as(as = "Hex")] Vec<u8>);

impl ValidatorAddress {
    /// Wrap raw address bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorAddress({})", self)
    }
}

/// Host-chain account address (orchestrators, senders).
#[serde_as]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountAddress(#[serde_as(as = "Hex")] Vec<u8>);

impl AccountAddress {
    /// Wrap raw address bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self)
    }
}

/// 20-byte Ethereum address.
///
/// Parsed from `0x`-prefixed hex in any letter case, rendered with the
/// EIP-55 checksum.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EthAddress([u8; 20]);

impl EthAddress {
    /// Zero address.
    pub const ZERO: EthAddress = EthAddress([0u8; 20]);

    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case checksum encoding.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for EthAddress {
    type Err = AttestationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AttestationError::InvalidEthAddress(s.to_string()))?;
        if digits.len() != 40 {
            return Err(AttestationError::InvalidEthAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AttestationError::InvalidEthAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthAddress({})", self)
    }
}

impl Serialize for EthAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Discriminator of an outgoing transaction kind.
///
/// The byte is the first byte of the kind's store index. `0x00` is taken by
/// signer sets so no outgoing tx index can collide with a signer set index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutgoingTxKind {
    /// Token batch withdrawal.
    Batch,
    /// Arbitrary logic call.
    ContractCall,
}

impl OutgoingTxKind {
    /// All kinds in discriminator order.
    pub const ALL: [OutgoingTxKind; 2] = [OutgoingTxKind::Batch, OutgoingTxKind::ContractCall];

    /// Discriminator byte.
    pub const fn as_byte(self) -> u8 {
        match self {
            OutgoingTxKind::Batch => 0x01,
            OutgoingTxKind::ContractCall => 0x02,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            OutgoingTxKind::Batch => "batch",
            OutgoingTxKind::ContractCall => "contract_call",
        }
    }
}

impl TryFrom<u8> for OutgoingTxKind {
    type Error = AttestationError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OutgoingTxKind::ALL
            .into_iter()
            .find(|kind| kind.as_byte() == byte)
            .ok_or(AttestationError::UnknownTxKind(byte))
    }
}

/// Store index byte of signer sets.
pub const SIGNER_SET_INDEX_BYTE: u8 = 0x00;

/// Opaque, collision-free key of an attested artifact.
///
/// Layouts:
/// - signer set: `0x00 ‖ BE(nonce)`
/// - batch: `0x01 ‖ token contract ‖ BE(batch nonce)`
/// - contract call: `0x02 ‖ len(scope) ‖ scope ‖ BE(invalidation nonce)`
///
/// Every layout is self-delimiting, so no index is a strict prefix of
/// another and a confirmation key can be split back into index and
/// validator. Deserialization accepts well-formed layouts only.
#[serde_as]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StoreIndex(#[serde_as(as = "Hex")] Vec<u8>);

impl StoreIndex {
    const NONCE_LEN: usize = 8;
    const SIGNER_SET_LEN: usize = 1 + Self::NONCE_LEN;
    const BATCH_LEN: usize = 1 + 20 + Self::NONCE_LEN;

    /// Index of a signer set.
    pub fn signer_set(nonce: u64) -> Self {
        let mut bytes = Vec::with_capacity(Self::SIGNER_SET_LEN);
        bytes.push(SIGNER_SET_INDEX_BYTE);
        bytes.extend_from_slice(&u64_to_be_bytes(nonce));
        Self(bytes)
    }

    /// Index of a batch.
    pub fn batch(token_contract: &EthAddress, batch_nonce: u64) -> Self {
        let mut bytes = Vec::with_capacity(Self::BATCH_LEN);
        bytes.push(OutgoingTxKind::Batch.as_byte());
        bytes.extend_from_slice(token_contract.as_bytes());
        bytes.extend_from_slice(&u64_to_be_bytes(batch_nonce));
        Self(bytes)
    }

    /// Index of a contract call. Fails when the scope exceeds 255 bytes.
    pub fn contract_call(scope: &[u8], invalidation_nonce: u64) -> AttestationResult<Self> {
        let len = u8::try_from(scope.len())
            .map_err(|_| AttestationError::ScopeTooLong { len: scope.len() })?;
        let mut bytes = Vec::with_capacity(2 + scope.len() + Self::NONCE_LEN);
        bytes.push(OutgoingTxKind::ContractCall.as_byte());
        bytes.push(len);
        bytes.extend_from_slice(scope);
        bytes.extend_from_slice(&u64_to_be_bytes(invalidation_nonce));
        Ok(Self(bytes))
    }

    /// Raw index bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Leading discriminator byte.
    pub fn kind_byte(&self) -> Option<u8> {
        self.0.first().copied()
    }

    /// Whether this indexes a signer set.
    pub fn is_signer_set(&self) -> bool {
        self.kind_byte() == Some(SIGNER_SET_INDEX_BYTE)
    }

    /// Split a well-formed index off the front of `bytes`.
    ///
    /// Returns the index and the remaining bytes.
    pub fn split_prefix(bytes: &[u8]) -> AttestationResult<(StoreIndex, &[u8])> {
        let kind = *bytes.first().ok_or_else(|| AttestationError::InvalidKey {
            reason: "empty store index".to_string(),
        })?;
        let len = match kind {
            SIGNER_SET_INDEX_BYTE => Self::SIGNER_SET_LEN,
            b if b == OutgoingTxKind::Batch.as_byte() => Self::BATCH_LEN,
            b if b == OutgoingTxKind::ContractCall.as_byte() => {
                let scope_len = *bytes.get(1).ok_or_else(|| AttestationError::InvalidKey {
                    reason: "contract call index missing scope length".to_string(),
                })?;
                2 + scope_len as usize + Self::NONCE_LEN
            }
            other => return Err(AttestationError::UnknownTxKind(other)),
        };
        if bytes.len() < len {
            return Err(AttestationError::InvalidKey {
                reason: format!(
                    "store index of kind 0x{:02x} needs {} bytes, got {}",
                    kind,
                    len,
                    bytes.len()
                ),
            });
        }
        let (index, rest) = bytes.split_at(len);
        Ok((StoreIndex(index.to_vec()), rest))
    }

    /// Parse bytes that must hold exactly one well-formed index.
    pub fn from_bytes(bytes: &[u8]) -> AttestationResult<StoreIndex> {
        let (index, rest) = Self::split_prefix(bytes)?;
        if !rest.is_empty() {
            return Err(AttestationError::InvalidKey {
                reason: format!("{} trailing bytes after store index {}", rest.len(), index),
            });
        }
        Ok(index)
    }
}

impl<'de> Deserialize<'de> for StoreIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <Hex as DeserializeAs<'de, Vec<u8>>>::deserialize_as(deserializer)?;
        StoreIndex::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for StoreIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for StoreIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreIndex({})", self)
    }
}

impl AsRef<[u8]> for StoreIndex {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
