//! Error taxonomy for SDK operations.
//!
//! Every operation failure is wrapped in one of these variants with a
//! human-readable message; the original cause is preserved through
//! `source()`. Causes are stored behind `Arc` so an error can be returned to
//! the caller and, at the same time, kept in a session or tracked-operation
//! error field.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use common::ValidationError;

/// Shared, cloneable error cause.
pub type ErrorCause = Arc<dyn Error + Send + Sync + 'static>;

/// Errors surfaced by SDK operations.
#[derive(Debug, Clone)]
pub enum FhevmError {
    /// An operation was attempted before a successful `init`.
    NotInitialized,
    /// Engine construction or the initial network query failed.
    Initialization {
        message: String,
        source: Option<ErrorCause>,
    },
    /// A value was rejected before encryption, or the engine call failed.
    Encryption {
        message: String,
        source: Option<ErrorCause>,
    },
    /// Decryption authorization or the engine call failed.
    Decryption {
        message: String,
        source: Option<ErrorCause>,
    },
    /// A malformed address, handle or value.
    Validation(ValidationError),
}

impl FhevmError {
    pub(crate) fn initialization(message: impl Into<String>) -> Self {
        FhevmError::Initialization {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn initialization_with(
        message: impl Into<String>,
        source: Box<dyn Error + Send + Sync>,
    ) -> Self {
        FhevmError::Initialization {
            message: message.into(),
            source: Some(Arc::from(source)),
        }
    }

    pub(crate) fn encryption(message: impl Into<String>) -> Self {
        FhevmError::Encryption {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn encryption_with(
        message: impl Into<String>,
        source: Box<dyn Error + Send + Sync>,
    ) -> Self {
        FhevmError::Encryption {
            message: message.into(),
            source: Some(Arc::from(source)),
        }
    }

    pub(crate) fn decryption_with(
        message: impl Into<String>,
        source: Box<dyn Error + Send + Sync>,
    ) -> Self {
        FhevmError::Decryption {
            message: message.into(),
            source: Some(Arc::from(source)),
        }
    }
}

impl fmt::Display for FhevmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FhevmError::NotInitialized => {
                write!(f, "client not initialized; call init() first")
            }
            FhevmError::Initialization { message, .. } => {
                write!(f, "failed to initialize FHEVM client: {}", message)
            }
            FhevmError::Encryption { message, .. } => {
                write!(f, "encryption failed: {}", message)
            }
            FhevmError::Decryption { message, .. } => {
                write!(f, "decryption failed: {}", message)
            }
            FhevmError::Validation(e) => write!(f, "{}", e),
        }
    }
}

impl Error for FhevmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FhevmError::NotInitialized => None,
            FhevmError::Initialization { source, .. }
            | FhevmError::Encryption { source, .. }
            | FhevmError::Decryption { source, .. } => match source {
                Some(cause) => Some(cause.as_ref()),
                None => None,
            },
            FhevmError::Validation(e) => Some(e),
        }
    }
}

impl From<ValidationError> for FhevmError {
    fn from(e: ValidationError) -> Self {
        FhevmError::Validation(e)
    }
}
