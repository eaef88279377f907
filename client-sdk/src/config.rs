//! Client configuration and the built-in network table.

use std::fmt;
use std::sync::Arc;

use crate::errors::FhevmError;
use crate::wallet::WalletProvider;

/// Static parameters of a known network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub chain_id: u64,
    pub gateway_url: &'static str,
}

/// Sepolia testnet.
pub const SEPOLIA: NetworkConfig = NetworkConfig {
    name: "sepolia",
    chain_id: 11155111,
    gateway_url: "https://gateway.sepolia.fhevm.io",
};

/// Local development node.
pub const LOCALHOST: NetworkConfig = NetworkConfig {
    name: "localhost",
    chain_id: 31337,
    gateway_url: "http://localhost:8545",
};

/// Looks up a built-in network by name.
pub fn known_network(name: &str) -> Option<&'static NetworkConfig> {
    match name {
        "sepolia" => Some(&SEPOLIA),
        "localhost" => Some(&LOCALHOST),
        _ => None,
    }
}

/// Configuration for a [`crate::FhevmClient`].
///
/// Immutable once supplied; handing a new config to a session tears the old
/// client down and initializes a fresh one.
#[derive(Clone)]
pub struct ClientConfig {
    /// Connection to the user's wallet and chain node.
    pub provider: Arc<dyn WalletProvider>,
    /// Network label; `sepolia` and `localhost` carry built-in parameters.
    pub network: String,
    /// Decryption gateway endpoint; defaults to the known network's gateway.
    pub gateway_url: Option<String>,
    /// Explicit chain id, skipping the provider query during `init`.
    pub chain_id: Option<u64>,
}

impl ClientConfig {
    pub fn new(provider: Arc<dyn WalletProvider>, network: impl Into<String>) -> Self {
        ClientConfig {
            provider,
            network: network.into(),
            gateway_url: None,
            chain_id: None,
        }
    }

    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Gateway endpoint for this config, falling back to the known network.
    pub fn gateway_endpoint(&self) -> Option<&str> {
        self.gateway_url
            .as_deref()
            .or_else(|| known_network(&self.network).map(|n| n.gateway_url))
    }

    /// Shape checks performed before the config is used.
    pub fn validate(&self) -> Result<(), FhevmError> {
        if self.network.is_empty() {
            return Err(FhevmError::initialization("network label must not be empty"));
        }
        if matches!(self.gateway_url.as_deref(), Some("")) {
            return Err(FhevmError::initialization(
                "gateway URL must not be empty when supplied",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("network", &self.network)
            .field("gateway_url", &self.gateway_url)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}
