//! Wallet/chain provider abstraction.
//!
//! Stands in for the EIP-1193 connection object a browser dApp receives from
//! the user's wallet: it answers network queries and signs decryption
//! authorizations. Implementations may suspend indefinitely while the user
//! decides; the SDK imposes no timeout of its own.

use std::error::Error;

use async_trait::async_trait;

use common::types::{EthAddress, Handle};

/// Error type at the provider seam. Wrapped into
/// [`crate::FhevmError`] at each operation boundary.
pub type WalletError = Box<dyn Error + Send + Sync>;

/// The payload presented to the wallet when authorizing a decryption,
/// mirroring the EIP-712 typed-data request a browser wallet displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionRequest {
    pub chain_id: u64,
    pub contract: EthAddress,
    pub handle: Handle,
}

/// A signed decryption authorization, as handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionAuthorization {
    pub signer: EthAddress,
    pub signature: Vec<u8>,
}

/// Connection to the user's wallet and its chain node.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Chain id reported by the connected node.
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Address of the active signer.
    async fn signer_address(&self) -> Result<EthAddress, WalletError>;

    /// Asks the wallet to sign a decryption authorization.
    async fn sign_decryption(&self, request: &DecryptionRequest) -> Result<Vec<u8>, WalletError>;
}
