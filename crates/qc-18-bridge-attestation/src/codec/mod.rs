//! # Record Codec
//!
//! Deterministic binary encoding of stored records.
//!
//! Records use bincode with fixed-width integers and reject trailing bytes,
//! so a value has exactly one valid encoding.

pub mod registry;

pub use registry::{KindRegistry, TxCodec, TxEnvelope};

use crate::domain::{AttestationError, AttestationResult, ValidatorAddress};
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode a record.
pub fn encode_record<T: Serialize>(what: &'static str, value: &T) -> AttestationResult<Vec<u8>> {
    options()
        .serialize(value)
        .map_err(|e| AttestationError::encode(what, e))
}

/// Decode a record.
pub fn decode_record<T: DeserializeOwned>(what: &'static str, bytes: &[u8]) -> AttestationResult<T> {
    options()
        .deserialize(bytes)
        .map_err(|e| AttestationError::decode(what, e))
}

/// Decode the unbonding validator list handed over by the staking module.
pub fn decode_unbonding_validators(bytes: &[u8]) -> AttestationResult<Vec<ValidatorAddress>> {
    decode_record("unbonding validators", bytes)
}

/// Encode an unbonding validator list.
pub fn encode_unbonding_validators(validators: &[ValidatorAddress]) -> AttestationResult<Vec<u8>> {
    encode_record("unbonding validators", &validators)
}
