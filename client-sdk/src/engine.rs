//! Engine abstraction over the external FHE library.
//!
//! The SDK needs exactly four capabilities from an encryption engine:
//! construction (via [`EngineFactory`]), encrypted-input creation,
//! authorized decryption and public-key access. The production FHE library
//! is one conforming implementation; [`crate::dev::DevEngine`] and the demo
//! gateway engine are others, which is what makes the client testable
//! without any cryptography.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;

use common::types::{EthAddress, Handle, TypedValue};

use crate::input::SealedInput;
use crate::wallet::DecryptionAuthorization;

/// Parameters an engine is constructed with, resolved during `init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub chain_id: u64,
    pub network: String,
    pub gateway_url: Option<String>,
}

/// Error type at the engine seam. Wrapped into [`crate::FhevmError`] at each
/// operation boundary.
pub type EngineError = Box<dyn Error + Send + Sync>;

/// An FHE encryption engine.
///
/// Implementations must tolerate concurrent calls on a shared reference;
/// the client performs no serialization of its own.
#[async_trait]
pub trait FhevmEngine: Send + Sync {
    /// Encrypts `values` for the `(contract, user)` pair, returning one
    /// handle per value and a single inclusion proof.
    async fn encrypt(
        &self,
        contract: EthAddress,
        user: EthAddress,
        values: &[TypedValue],
    ) -> Result<SealedInput, EngineError>;

    /// Decrypts `handle` under an authorization signed by the wallet owner.
    async fn decrypt(
        &self,
        contract: EthAddress,
        handle: Handle,
        authorization: &DecryptionAuthorization,
    ) -> Result<u128, EngineError>;

    /// Public key of the FHE key pair this engine encrypts under.
    fn public_key(&self) -> String;
}

/// Builds engine instances; a client's `init` calls this exactly once per
/// configuration.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn create_engine(&self, config: &EngineConfig) -> Result<Arc<dyn FhevmEngine>, EngineError>;
}
