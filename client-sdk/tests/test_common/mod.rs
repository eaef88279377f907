//! Test doubles and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use fhevm_client_sdk::common::types::EthAddress;
use fhevm_client_sdk::config::ClientConfig;
use fhevm_client_sdk::dev::{DevEngine, DevWallet};
use fhevm_client_sdk::engine::{EngineConfig, EngineError, EngineFactory, FhevmEngine};
use fhevm_client_sdk::wallet::{DecryptionRequest, WalletError, WalletProvider};

pub const CONTRACT: &str = "0x1111111111111111111111111111111111111111";
pub const USER: &str = "0x2222222222222222222222222222222222222222";

/// Localhost config over a dev wallet.
pub fn dev_config() -> ClientConfig {
    ClientConfig::new(Arc::new(DevWallet::new(31337, b"test-wallet")), "localhost")
}

/// Factory counting engine constructions.
#[derive(Default)]
pub struct CountingFactory {
    calls: AtomicUsize,
}

impl CountingFactory {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineFactory for CountingFactory {
    async fn create_engine(
        &self,
        config: &EngineConfig,
    ) -> Result<Arc<dyn FhevmEngine>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(DevEngine::new(config.chain_id)))
    }
}

/// Factory whose construction always fails.
pub struct FailingFactory;

#[async_trait]
impl EngineFactory for FailingFactory {
    async fn create_engine(
        &self,
        _config: &EngineConfig,
    ) -> Result<Arc<dyn FhevmEngine>, EngineError> {
        Err("engine construction failed".into())
    }
}

/// Factory that stalls its first construction so a later one can overtake
/// it.
#[derive(Default)]
pub struct SlowFirstFactory {
    calls: AtomicUsize,
}

#[async_trait]
impl EngineFactory for SlowFirstFactory {
    async fn create_engine(
        &self,
        config: &EngineConfig,
    ) -> Result<Arc<dyn FhevmEngine>, EngineError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Ok(Arc::new(DevEngine::new(config.chain_id)))
    }
}

/// Wallet wrapper counting every provider call.
pub struct CountingWallet {
    inner: DevWallet,
    calls: AtomicUsize,
}

impl CountingWallet {
    pub fn new(inner: DevWallet) -> Self {
        CountingWallet {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for CountingWallet {
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
