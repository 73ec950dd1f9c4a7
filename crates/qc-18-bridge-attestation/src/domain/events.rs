//! # Domain Events
//!
//! Events handed to the `EventSink` port.

use super::value_objects::{EthAddress, OutgoingTxKind, StoreIndex};
use serde::{Deserialize, Serialize};

/// Events emitted by the attestation core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttestationEvent {
    /// A new signer set awaits confirmations.
    SignerSetRequested {
        /// Bridge contract on the foreign chain.
        contract: EthAddress,
        /// Foreign chain id.
        chain_id: u64,
        /// Signer set nonce.
        nonce: u64,
    },
    /// An outgoing transaction was queued.
    OutgoingTxQueued {
        /// Transaction kind.
        kind: OutgoingTxKind,
        /// Store index of the transaction.
        store_index: StoreIndex,
    },
}

impl AttestationEvent {
    /// Event type name.
    pub fn name(&self) -> &'static str {
        match self {
            AttestationEvent::SignerSetRequested { .. } => "signer_set_request",
            AttestationEvent::OutgoingTxQueued { .. } => "outgoing_tx_queued",
        }
    }

    /// Flat key/value attributes.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            AttestationEvent::SignerSetRequested {
                contract,
                chain_id,
                nonce,
            } => vec![
                ("bridge_contract", contract.to_string()),
                ("bridge_chain_id", chain_id.to_string()),
                ("signer_set_nonce", nonce.to_string()),
            ],
            AttestationEvent::OutgoingTxQueued { kind, store_index } => vec![
                ("kind", kind.name().to_string()),
                ("store_index", store_index.to_string()),
            ],
        }
    }
}
