//! # Domain Layer
//!
//! Pure types and rules of bridge attestation. No I/O.

pub mod entities;
pub mod errors;
pub mod events;
pub mod keys;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use keys::{prefix_upper_bound, u64_from_be_bytes, u64_to_be_bytes, KeyPrefix, KeyRange};
pub use value_objects::*;
