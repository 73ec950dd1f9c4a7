//! # Integration Flows
//!
//! Multi-step scenarios driven through the public `BridgeKeeper` API.

pub mod export_import;
pub mod relay_flow;
pub mod signer_set_flow;
pub mod staged_step;
