//! # Bridge Attestation Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Shared fixtures and log setup
//! └── integration/      # End-to-end flows through BridgeKeeper
//!     ├── signer_set_flow.rs
//!     ├── relay_flow.rs
//!     ├── export_import.rs
//!     └── staged_step.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # With logs
//! RUST_LOG=debug cargo test -p qc-tests -- --nocapture
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod integration;
pub mod support;
