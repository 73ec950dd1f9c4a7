//! # Ports Module
//!
//! Hexagonal architecture ports (interfaces).
//!
//! - **Inbound**: what the subsystem exposes (`SignerSetStore`, `ConfirmationLedger`,
//!   `OutgoingTxQueue`, `DelegationRegistry`)
//! - **Outbound**: what it needs (`KeyValueStore`, `PowerSource`, `EventSink`)

pub mod inbound;
pub mod outbound;

pub use inbound::{ConfirmationLedger, DelegationRegistry, OutgoingTxQueue, SignerSetStore};
pub use outbound::{BatchOperation, EventSink, KeyValueStore, PowerSource, ScanOrder, ScanResult};
