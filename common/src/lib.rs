//! Shared types and helpers for the FHEVM SDK.
//!
//! This crate holds everything the SDK and the demo apps exchange: the
//! encrypted-type vocabulary, the pure validation and conversion helpers,
//! and the JSON surface of the demo gateway. It performs no I/O and owns no
//! state; every function here is deterministic.

pub mod api;
pub mod error;
pub mod types;
pub mod units;
pub mod validation;

pub use error::ValidationError;
pub use types::{DecryptedValue, EthAddress, FheType, Handle, Hash256, TypedValue};
