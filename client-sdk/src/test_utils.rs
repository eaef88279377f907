//! Helpers for exercising the SDK in downstream test suites.
//!
//! Gated behind the `test-utils` feature; enable it from a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! sdk = { package = "fhevm-client-sdk", path = "...", features = ["test-utils"] }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use common::types::{EthAddress, Handle, TypedValue};

use crate::client::FhevmClient;
use crate::config::ClientConfig;
use crate::dev::{DevEngineFactory, DevWallet};
use crate::engine::{EngineConfig, EngineError, EngineFactory, FhevmEngine};
use crate::input::SealedInput;
use crate::session::{FhevmSession, SessionStatus};
use crate::wallet::{DecryptionAuthorization, DecryptionRequest, WalletError, WalletProvider};

/// Localhost config over a dev wallet.
pub fn dev_config() -> ClientConfig {
    ClientConfig::new(Arc::new(DevWallet::new(31337, b"test-wallet")), "localhost")
}

/// A dev client that has already completed `init`.
pub async fn ready_client() -> Arc<FhevmClient> {
    let client =
        FhevmClient::new(dev_config(), Arc::new(DevEngineFactory)).expect("valid dev config");
    client.init().await.expect("dev init cannot fail");
    Arc::new(client)
}

/// A session already in the `Ready` state over the dev engine.
pub async fn ready_session() -> FhevmSession {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    session
        .set_config(dev_config())
        .await
        .expect("init task panicked");
    assert_eq!(session.status(), SessionStatus::Ready);
    session
}

/// Factory whose construction always fails, for initialization-failure
/// paths.
#[derive(Debug, Default)]
pub struct FailingEngineFactory;

#[async_trait]
impl EngineFactory for FailingEngineFactory {
    async fn create_engine(
        &self,
        _config: &EngineConfig,
    ) -> Result<Arc<dyn FhevmEngine>, EngineError> {
        Err("engine construction failed".into())
    }
}

/// Wallet wrapper counting how often the chain or the user is reached.
pub struct CountingWallet<W> {
    inner: W,
    calls: AtomicUsize,
}

impl<W> CountingWallet<W> {
    pub fn new(inner: W) -> Self {
        CountingWallet {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Total provider calls of any kind.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<W: WalletProvider> WalletProvider for CountingWallet<W> {
    async fn chain_id(&self) -> Result<u64, WalletError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.chain_id().await
    }

    async fn signer_address(&self) -> Result<EthAddress, WalletError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.signer_address().await
    }

    async fn sign_decryption(&self, request: &DecryptionRequest) -> Result<Vec<u8>, WalletError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign_decryption(request).await
    }
}

/// Engine whose decrypt always returns the same raw value, for range-check
/// paths.
pub struct FixedValueEngine {
    raw: u128,
}

impl FixedValueEngine {
    pub fn new(raw: u128) -> Self {
        FixedValueEngine { raw }
    }
}

#[async_trait]
impl FhevmEngine for FixedValueEngine {
    async fn encrypt(
        &self,
        _contract: EthAddress,
        _user: EthAddress,
        values: &[TypedValue],
    ) -> Result<SealedInput, EngineError> {
        Ok(SealedInput {
            handles: vec![[0u8; 32]; values.len()],
            input_proof: "0x00".to_string(),
        })
    }

    async fn decrypt(
        &self,
        _contract: EthAddress,
        _handle: Handle,
        _authorization: &DecryptionAuthorization,
    ) -> Result<u128, EngineError> {
        Ok(self.raw)
    }

    fn public_key(&self) -> String {
        "0xfixed".to_string()
    }
}

/// Factory for [`FixedValueEngine`].
pub struct FixedValueFactory {
    raw: u128,
}

impl FixedValueFactory {
    pub fn new(raw: u128) -> Self {
        FixedValueFactory { raw }
    }
}

#[async_trait]
impl EngineFactory for FixedValueFactory {
    async fn create_engine(
        &self,
        _config: &EngineConfig,
    ) -> Result<Arc<dyn FhevmEngine>, EngineError> {
        Ok(Arc::new(FixedValueEngine::new(self.raw)))
    }
}
