//! Deterministic development stand-ins for the engine and wallet seams.
//!
//! Nothing here is cryptography. Handles, proofs and signatures are sha256
//! digests over their inputs, and "decryption" replays the value remembered
//! at encryption time. This mirrors the placeholder server-side handles the
//! original demo returns, and gives demos and tests a fully offline,
//! reproducible engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use common::types::{EthAddress, FheType, Handle, TypedValue};

use crate::engine::{EngineConfig, EngineError, EngineFactory, FhevmEngine};
use crate::input::SealedInput;
use crate::wallet::{DecryptionAuthorization, DecryptionRequest, WalletError, WalletProvider};

// Domain separators so fabricated artifacts cannot collide across uses.
const HANDLE_TAG: &[u8] = b"fhevm-dev-handle";
const PROOF_TAG: &[u8] = b"fhevm-dev-proof";
const KEY_TAG: &[u8] = b"fhevm-dev-public-key";
const SIG_TAG: &[u8] = b"fhevm-dev-signature";
const WALLET_TAG: &[u8] = b"fhevm-dev-wallet";

/// Offline engine that fabricates handles and remembers the values behind
/// them.
pub struct DevEngine {
    chain_id: u64,
    public_key: String,
    values: Mutex<HashMap<Handle, TypedValue>>,
}

impl DevEngine {
    pub fn new(chain_id: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(KEY_TAG);
        hasher.update(chain_id.to_be_bytes());
        let public_key = format!("0x{}", hex::encode(hasher.finalize()));
        DevEngine {
            chain_id,
            public_key,
            values: Mutex::new(HashMap::new()),
        }
    }

    fn handle_for(
        &self,
        contract: EthAddress,
        user: EthAddress,
        index: u32,
        value: TypedValue,
    ) -> Handle {
        let mut hasher = Sha256::new();
        hasher.update(HANDLE_TAG);
        hasher.update(self.chain_id.to_be_bytes());
        hasher.update(contract);
        hasher.update(user);
        hasher.update(index.to_be_bytes());
        hasher.update([value.fhe_type().bits() as u8]);
        hasher.update(value.raw().to_be_bytes());
        let mut handle = [0u8; 32];
        handle.copy_from_slice(&hasher.finalize());
        handle
    }

    /// The declared type behind a fabricated handle, if known.
    pub fn stored_type(&self, handle: &Handle) -> Option<FheType> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(handle)
            .map(|v| v.fhe_type())
    }

    /// Number of handles this engine currently remembers.
    pub fn stored_values(&self) -> usize {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl FhevmEngine for DevEngine {
    async fn encrypt(
        &self,
        contract: EthAddress,
        user: EthAddress,
        values: &[TypedValue],
    ) -> Result<SealedInput, EngineError> {
        let mut handles = Vec::with_capacity(values.len());
        let mut proof = Sha256::new();
        proof.update(PROOF_TAG);
        proof.update(contract);
        proof.update(user);

        let mut store = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        for (index, value) in values.iter().enumerate() {
            let handle = self.handle_for(contract, user, index as u32, *value);
            proof.update(handle);
            store.insert(handle, *value);
            handles.push(handle);
        }

        Ok(SealedInput {
            handles,
            input_proof: format!("0x{}", hex::encode(proof.finalize())),
        })
    }

    async fn decrypt(
        &self,
        _contract: EthAddress,
        handle: Handle,
        authorization: &DecryptionAuthorization,
    ) -> Result<u128, EngineError> {
        if authorization.signature.is_empty() {
            return Err("authorization signature is empty".into());
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&handle)
            .map(|value| value.raw() as u128)
            .ok_or_else(|| format!("unknown handle 0x{}", hex::encode(handle)).into())
    }

    fn public_key(&self) -> String {
        self.public_key.clone()
    }
}

/// Factory producing one [`DevEngine`] per configuration.
#[derive(Debug, Default, Clone)]
pub struct DevEngineFactory;

#[async_trait]
impl EngineFactory for DevEngineFactory {
    async fn create_engine(
        &self,
        config: &EngineConfig,
    ) -> Result<Arc<dyn FhevmEngine>, EngineError> {
        Ok(Arc::new(DevEngine::new(config.chain_id)))
    }
}

/// Wallet stand-in with a fixed signer derived from a seed.
pub struct DevWallet {
    chain_id: u64,
    address: EthAddress,
    seed: Vec<u8>,
}

impl DevWallet {
    pub fn new(chain_id: u64, seed: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(WALLET_TAG);
        hasher.update(seed);
        let digest = hasher.finalize();
        let mut address = [0u8; 20];
        address.copy_from_slice(&digest[..20]);
        DevWallet {
            chain_id,
            address,
            seed: seed.to_vec(),
        }
    }

    pub fn address(&self) -> EthAddress {
        self.address
    }
}

#[async_trait]
impl WalletProvider for DevWallet {
    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id)
    }

    async fn signer_address(&self) -> Result<EthAddress, WalletError> {
        Ok(self.address)
    }

    async fn sign_decryption(&self, request: &DecryptionRequest) -> Result<Vec<u8>, WalletError> {
        let mut hasher = Sha256::new();
        hasher.update(SIG_TAG);
        hasher.update(&self.seed);
        hasher.update(request.chain_id.to_be_bytes());
        hasher.update(request.contract);
        hasher.update(request.handle);
        Ok(hasher.finalize().to_vec())
    }
}
