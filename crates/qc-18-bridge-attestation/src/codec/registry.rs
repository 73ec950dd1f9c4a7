//! # Outgoing Tx Kind Registry
//!
//! Maps discriminator bytes to payload codecs. Outgoing transactions are
//! stored as a `TxEnvelope { kind, payload }`; the registry packs a typed
//! transaction into an envelope and unpacks it again.

use super::{decode_record, encode_record};
use crate::domain::{
    AttestationError, AttestationResult, BatchTx, ContractCallTx, OutgoingTx, OutgoingTxKind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Self-describing stored form of an outgoing transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEnvelope {
    /// Kind discriminator byte.
    pub kind: u8,
    /// Kind-specific encoded payload.
    pub payload: Vec<u8>,
}

/// Payload codec of one kind.
#[derive(Clone, Copy)]
pub struct TxCodec {
    /// Kind handled by this codec.
    pub kind: OutgoingTxKind,
    /// Encode the payload of a transaction of this kind.
    pub encode: fn(&OutgoingTx) -> AttestationResult<Vec<u8>>,
    /// Decode a payload back into a transaction.
    pub decode: fn(&[u8]) -> AttestationResult<OutgoingTx>,
}

impl std::fmt::Debug for TxCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxCodec").field("kind", &self.kind).finish()
    }
}

fn kind_mismatch(expected: OutgoingTxKind, tx: &OutgoingTx) -> AttestationError {
    AttestationError::integrity(format!(
        "{} codec handed a {} transaction",
        expected.name(),
        tx.kind().name()
    ))
}

fn encode_batch(tx: &OutgoingTx) -> AttestationResult<Vec<u8>> {
    match tx {
        OutgoingTx::Batch(batch) => encode_record("batch tx", batch),
        other => Err(kind_mismatch(OutgoingTxKind::Batch, other)),
    }
}

fn decode_batch(bytes: &[u8]) -> AttestationResult<OutgoingTx> {
    decode_record::<BatchTx>("batch tx", bytes).map(OutgoingTx::Batch)
}

fn encode_contract_call(tx: &OutgoingTx) -> AttestationResult<Vec<u8>> {
    match tx {
        OutgoingTx::ContractCall(call) => encode_record("contract call tx", call),
        other => Err(kind_mismatch(OutgoingTxKind::ContractCall, other)),
    }
}

fn decode_contract_call(bytes: &[u8]) -> AttestationResult<OutgoingTx> {
    decode_record::<ContractCallTx>("contract call tx", bytes).map(OutgoingTx::ContractCall)
}

/// Registry of payload codecs keyed by discriminator byte.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    codecs: BTreeMap<u8, TxCodec>,
}

impl KindRegistry {
    /// Registry without any codec.
    pub fn empty() -> Self {
        Self {
            codecs: BTreeMap::new(),
        }
    }

    /// Register a codec. A discriminator can only be registered once.
    pub fn register(&mut self, codec: TxCodec) -> AttestationResult<()> {
        let byte = codec.kind.as_byte();
        if self.codecs.contains_key(&byte) {
            return Err(AttestationError::Config(format!(
                "outgoing tx kind 0x{:02x} registered twice",
                byte
            )));
        }
        self.codecs.insert(byte, codec);
        Ok(())
    }

    /// Codec for a discriminator byte.
    pub fn codec(&self, kind: u8) -> AttestationResult<&TxCodec> {
        self.codecs
            .get(&kind)
            .ok_or(AttestationError::UnknownTxKind(kind))
    }

    /// Registered kinds in discriminator order.
    pub fn kinds(&self) -> impl Iterator<Item = OutgoingTxKind> + '_ {
        self.codecs.values().map(|c| c.kind)
    }

    /// Encode a transaction into envelope bytes.
    pub fn pack(&self, tx: &OutgoingTx) -> AttestationResult<Vec<u8>> {
        let kind = tx.kind().as_byte();
        let codec = self.codec(kind)?;
        let envelope = TxEnvelope {
            kind,
            payload: (codec.encode)(tx)?,
        };
        encode_record("outgoing tx envelope", &envelope)
    }

    /// Decode envelope bytes into a transaction.
    pub fn unpack(&self, bytes: &[u8]) -> AttestationResult<OutgoingTx> {
        let envelope: TxEnvelope = decode_record("outgoing tx envelope", bytes)?;
        let codec = self.codec(envelope.kind)?;
        let tx = (codec.decode)(&envelope.payload)?;
        if tx.kind() != codec.kind {
            return Err(kind_mismatch(codec.kind, &tx));
        }
        Ok(tx)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        let mut codecs = BTreeMap::new();
        for codec in [
            TxCodec {
                kind: OutgoingTxKind::Batch,
                encode: encode_batch,
                decode: decode_batch,
            },
            TxCodec {
                kind: OutgoingTxKind::ContractCall,
                encode: encode_contract_call,
                decode: decode_contract_call,
            },
        ] {
            codecs.insert(codec.kind.as_byte(), codec);
        }
        Self { codecs }
    }
}
