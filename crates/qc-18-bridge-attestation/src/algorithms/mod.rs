//! # Algorithms Module
//!
//! Deterministic signer set derivation.

pub mod power;

pub use power::{build_signer_set, normalize_power, MAX_NORMALIZED_POWER};
