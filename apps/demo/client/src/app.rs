//! Session wiring for the demo CLI.

use std::sync::Arc;

use common::api::{ComputeOperation, ComputeRequest, ComputeResponse, GatewayRequest, KeysResponse};
use common::types::{DecryptedValue, FheType};

use sdk::config::ClientConfig;
use sdk::dev::DevWallet;
use sdk::engine::EngineError;
use sdk::errors::FhevmError;
use sdk::input::SealedInput;
use sdk::session::{FhevmSession, SessionStatus};
use sdk::tracked::{DecryptAction, EncryptedInputAction};

use crate::gateway::{GatewayConnection, GatewayEngineFactory};

/// Demo application state: one session plus the tracked operations a dApp's
/// UI layer would hold, all backed by the gateway engine and a dev wallet.
pub struct DemoApp {
    session: FhevmSession,
    decrypt: DecryptAction,
    wallet: Arc<DevWallet>,
    gateway_address: String,
    network: String,
    chain_id: u64,
}

impl DemoApp {
    pub fn new(gateway_address: impl Into<String>, network: impl Into<String>, chain_id: u64) -> Self {
        let gateway_address = gateway_address.into();
        let session = FhevmSession::new(Arc::new(GatewayEngineFactory::new(&gateway_address)));
        DemoApp {
            decrypt: DecryptAction::new(session.clone()),
            session,
            wallet: Arc::new(DevWallet::new(chain_id, b"fhevm-demo-wallet")),
            gateway_address,
            network: network.into(),
            chain_id,
        }
    }

    /// (Re)initializes the session against the gateway and waits for the
    /// outcome.
    pub async fn init(&self) -> Result<(), FhevmError> {
        let config = ClientConfig::new(self.wallet.clone(), self.network.clone())
            .with_chain_id(self.chain_id);
        let _ = self.session.set_config(config);
        self.session.wait_ready().await.map(drop)
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn session(&self) -> &FhevmSession {
        &self.session
    }

    /// The dev wallet's signer address, `0x`-prefixed.
    pub fn wallet_address(&self) -> String {
        format!("0x{}", hex::encode(self.wallet.address()))
    }

    /// Public key reported by the connected engine.
    pub fn public_key(&self) -> Result<String, FhevmError> {
        self.session
            .client()
            .ok_or(FhevmError::NotInitialized)?
            .public_key()
    }

    /// Encrypts one value for `contract`, on behalf of `user` (the dev
    /// wallet when omitted).
    pub async fn encrypt(
        &self,
        contract: &str,
        user: Option<&str>,
        value: i128,
        ty: FheType,
    ) -> Result<SealedInput, FhevmError> {
        let user = user.map(str::to_owned).unwrap_or_else(|| self.wallet_address());
        let action = EncryptedInputAction::new(self.session.clone(), contract);
        let mut input = action.create_input(&user).await?;
        input.add_plain(value, ty)?;
        input.seal().await
    }

    /// Decrypts a handle as the declared type.
    pub async fn decrypt(
        &self,
        handle: &str,
        contract: &str,
        ty: FheType,
    ) -> Result<DecryptedValue, FhevmError> {
        self.decrypt.decrypt(handle, contract, ty).await
    }

    /// Runs the gateway's demo compute operation.
    pub async fn compute(
        &self,
        operation: ComputeOperation,
        operand1: i64,
        operand2: i64,
        contract: &str,
        user: Option<&str>,
    ) -> Result<ComputeResponse, EngineError> {
        let user = user.map(str::to_owned).unwrap_or_else(|| self.wallet_address());
        let connection = GatewayConnection::connect(&self.gateway_address).await?;
        connection
            .exchange(&GatewayRequest::Compute(ComputeRequest {
                operation,
                operand1,
                operand2,
                contract_address: contract.to_string(),
                user_address: user,
            }))
            .await
    }

    /// Fetches the gateway's key material.
    pub async fn keys(&self) -> Result<KeysResponse, EngineError> {
        let connection = GatewayConnection::connect(&self.gateway_address).await?;
        connection.exchange(&GatewayRequest::Keys).await
    }
}
