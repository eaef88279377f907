//! The client wrapper that owns the engine instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tokio::sync::Mutex;

use common::types::{DecryptedValue, EthAddress, FheType};
use common::validation;

use crate::config::ClientConfig;
use crate::engine::{EngineConfig, EngineFactory, FhevmEngine};
use crate::errors::FhevmError;
use crate::input::EncryptedInputBuilder;
use crate::wallet::{DecryptionAuthorization, DecryptionRequest, WalletError, WalletProvider};

/// Client for FHE-enabled contract interaction.
///
/// Owns a single engine instance created by [`init`](Self::init); every
/// other operation requires a successful `init` first and fails with
/// [`FhevmError::NotInitialized`] otherwise.
pub struct FhevmClient {
    config: ClientConfig,
    factory: Arc<dyn EngineFactory>,
    engine: RwLock<Option<Arc<dyn FhevmEngine>>>,
    chain_id: OnceLock<u64>,
    initialized: AtomicBool,
    init_lock: Mutex<()>,
}

impl FhevmClient {
    /// Creates an uninitialized client. Fails on a malformed configuration.
    pub fn new(config: ClientConfig, factory: Arc<dyn EngineFactory>) -> Result<Self, FhevmError> {
        config.validate()?;
        Ok(FhevmClient {
            config,
            factory,
            engine: RwLock::new(None),
            chain_id: OnceLock::new(),
            initialized: AtomicBool::new(false),
            init_lock: Mutex::new(()),
        })
    }

    /// Initializes the engine.
    ///
    /// Idempotent: a no-op after the first success. Concurrent calls are
    /// serialized so only one engine is ever constructed per client.
    pub async fn init(&self) -> Result<(), FhevmError> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }
        let _guard = self.init_lock.lock().await;
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        let chain_id = match self.config.chain_id {
            Some(id) => id,
            None => self
                .config
                .provider
                .chain_id()
                .await
                .map_err(|e| FhevmError::initialization_with("chain id query failed", e))?,
        };

        let engine_config = EngineConfig {
            chain_id,
            network: self.config.network.clone(),
            gateway_url: self.config.gateway_endpoint().map(str::to_owned),
        };
        let engine = self
            .factory
            .create_engine(&engine_config)
            .await
            .map_err(|e| FhevmError::initialization_with("engine construction failed", e))?;

        *self.engine.write().unwrap_or_else(PoisonError::into_inner) = Some(engine);
        let _ = self.chain_id.set(chain_id);
        self.initialized.store(true, Ordering::Release);
        log::debug!("FHEVM client initialized for chain {}", chain_id);
        Ok(())
    }

    /// Whether `init` has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn engine(&self) -> Result<Arc<dyn FhevmEngine>, FhevmError> {
        self.engine
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(FhevmError::NotInitialized)
    }

    /// Chain id resolved during `init`.
    pub fn chain_id(&self) -> Result<u64, FhevmError> {
        self.chain_id.get().copied().ok_or(FhevmError::NotInitialized)
    }

    /// Public key of the engine's FHE key pair.
    pub fn public_key(&self) -> Result<String, FhevmError> {
        Ok(self.engine()?.public_key())
    }

    /// The wallet connection this client was configured with.
    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.config.provider
    }

    /// Address of the wallet's active signer. Convenience passthrough; the
    /// error comes straight from the provider.
    pub async fn signer_address(&self) -> Result<EthAddress, WalletError> {
        self.config.provider.signer_address().await
    }

    /// Builds an encrypted input bound to `(contract, user)`.
    pub fn create_encrypted_input(
        &self,
        contract_address: &str,
        user_address: &str,
    ) -> Result<EncryptedInputBuilder, FhevmError> {
        let engine = self.engine()?;
        let contract = validation::parse_address(contract_address)?;
        let user = validation::parse_address(user_address)?;
        Ok(EncryptedInputBuilder::new(engine, contract, user))
    }

    /// Decrypts `handle` from `contract`, checking the result against the
    /// declared `expected` type.
    ///
    /// The handle and address are validated before any provider or engine
    /// call; a malformed handle never reaches the network.
    pub async fn decrypt(
        &self,
        handle: &str,
        contract_address: &str,
        expected: FheType,
    ) -> Result<DecryptedValue, FhevmError> {
        let engine = self.engine()?;
        let handle = validation::parse_handle(handle)?;
        let contract = validation::parse_address(contract_address)?;
        let chain_id = self.chain_id()?;

        let signer = self
            .config
            .provider
            .signer_address()
            .await
            .map_err(|e| FhevmError::decryption_with("signer query failed", e))?;
        let request = DecryptionRequest {
            chain_id,
            contract,
            handle,
        };
        let signature = self
            .config
            .provider
            .sign_decryption(&request)
            .await
            .map_err(|e| FhevmError::decryption_with("authorization was not granted", e))?;

        let authorization = DecryptionAuthorization { signer, signature };
        let raw = engine
            .decrypt(contract, handle, &authorization)
            .await
            .map_err(|e| FhevmError::decryption_with("engine call failed", e))?;

        DecryptedValue::from_raw(raw, expected).map_err(|e| {
            FhevmError::decryption_with(
                "engine returned a value outside the declared type",
                Box::new(e),
            )
        })
    }
}
