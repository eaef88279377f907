//! Errors produced by the pure validation and conversion helpers.

use core::fmt;

/// A value, address, handle or number string that failed a shape check.
///
/// Each variant carries a human-readable description of what was rejected;
/// messages are safe to show to end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A value outside the range of its declared encrypted type.
    InvalidValue(String),
    /// A malformed contract or user address.
    InvalidAddress(String),
    /// A malformed ciphertext handle.
    InvalidHandle(String),
    /// A malformed 32-byte hash.
    InvalidHash(String),
    /// A malformed decimal or hex number string.
    InvalidNumber(String),
    /// Arithmetic overflow during a unit conversion.
    Overflow(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidValue(msg) => write!(f, "{}", msg),
            ValidationError::InvalidAddress(msg) => write!(f, "{}", msg),
            ValidationError::InvalidHandle(msg) => write!(f, "{}", msg),
            ValidationError::InvalidHash(msg) => write!(f, "{}", msg),
            ValidationError::InvalidNumber(msg) => write!(f, "{}", msg),
            ValidationError::Overflow(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}
