//! Gateway transport and the remote engine implementation.
//!
//! [`GatewayConnection`] speaks length-prefixed JSON frames over TCP;
//! [`GatewayEngine`] implements the SDK's engine trait on top of it, which
//! is what lets the whole client stack run against a remote stand-in
//! instead of an in-process library.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use common::api::{
    ApiResponse, DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, GatewayRequest,
    KeysResponse, PlainValue,
};
use common::types::{EthAddress, Handle, TypedValue};
use common::validation;

use sdk::comm;
use sdk::engine::{EngineConfig, EngineError, EngineFactory, FhevmEngine};
use sdk::input::SealedInput;
use sdk::wallet::DecryptionAuthorization;

fn hex_addr(address: EthAddress) -> String {
    format!("0x{}", hex::encode(address))
}

/// Framed JSON connection to the demo gateway. Exchanges are serialized on
/// the shared stream.
pub struct GatewayConnection {
    stream: Mutex<TcpStream>,
}

impl GatewayConnection {
    pub async fn connect(address: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        Ok(GatewayConnection {
            stream: Mutex::new(stream),
        })
    }

    /// One request/response exchange. Gateway-reported failures surface as
    /// errors carrying the envelope's message.
    pub async fn exchange<T: DeserializeOwned>(
        &self,
        request: &GatewayRequest,
    ) -> Result<T, EngineError> {
        let payload = serde_json::to_vec(request)?;
        let mut stream = self.stream.lock().await;
        comm::write_frame(&mut *stream, &payload).await?;
        let raw = comm::read_frame(&mut *stream).await?;
        drop(stream);

        let response: ApiResponse<T> = serde_json::from_slice(&raw)?;
        if response.success {
            response
                .data
                .ok_or_else(|| "gateway response is missing its data field".into())
        } else {
            Err(response
                .error
                .unwrap_or_else(|| "gateway reported an unspecified failure".to_string())
                .into())
        }
    }
}

/// Engine implementation that forwards encryption work to the gateway.
pub struct GatewayEngine {
    connection: Arc<GatewayConnection>,
    public_key: String,
}

impl GatewayEngine {
    /// Connects and fetches the gateway's key material.
    pub async fn connect(address: &str) -> Result<(Self, KeysResponse), EngineError> {
        let connection = Arc::new(GatewayConnection::connect(address).await?);
        let keys: KeysResponse = connection.exchange(&GatewayRequest::Keys).await?;
        let engine = GatewayEngine {
            connection,
            public_key: keys.public_key.clone(),
        };
        Ok((engine, keys))
    }
}

#[async_trait]
impl FhevmEngine for GatewayEngine {
    async fn encrypt(
        &self,
        contract: EthAddress,
        user: EthAddress,
        values: &[TypedValue],
    ) -> Result<SealedInput, EngineError> {
        // The gateway API encrypts one value per request; a batch keeps the
        // proof of its last request.
        let mut handles = Vec::with_capacity(values.len());
        let mut proof = String::new();
        for value in values {
            let plain = match value {
                TypedValue::Ebool(b) => PlainValue::Bool(*b),
                other => PlainValue::Uint(other.raw()),
            };
            let request = GatewayRequest::Encrypt(EncryptRequest {
                value: plain,
                contract_address: hex_addr(contract),
                user_address: hex_addr(user),
                value_type: value.fhe_type(),
            });
            let response: EncryptResponse = self.connection.exchange(&request).await?;
            handles.push(validation::parse_handle(&response.handle)?);
            proof = response.proof;
        }
        Ok(SealedInput {
            handles,
            input_proof: proof,
        })
    }

    async fn decrypt(
        &self,
        contract: EthAddress,
        handle: Handle,
        authorization: &DecryptionAuthorization,
    ) -> Result<u128, EngineError> {
        let request = GatewayRequest::Decrypt(DecryptRequest {
            handle: format!("0x{}", hex::encode(handle)),
            contract_address: hex_addr(contract),
            signature: Some(format!("0x{}", hex::encode(&authorization.signature))),
        });
        let response: DecryptResponse = self.connection.exchange(&request).await?;
        match response.value {
            PlainValue::Bool(b) => Ok(u128::from(b)),
            PlainValue::Uint(v) => Ok(u128::from(v)),
            PlainValue::Int(v) if v >= 0 => Ok(v as u128),
            PlainValue::Int(v) => Err(format!("gateway returned a negative value: {}", v).into()),
        }
    }

    fn public_key(&self) -> String {
        self.public_key.clone()
    }
}

/// Factory connecting to a fixed gateway address.
pub struct GatewayEngineFactory {
    address: String,
}

impl GatewayEngineFactory {
    pub fn new(address: impl Into<String>) -> Self {
        GatewayEngineFactory {
            address: address.into(),
        }
    }
}

#[async_trait]
impl EngineFactory for GatewayEngineFactory {
    async fn create_engine(
        &self,
        config: &EngineConfig,
    ) -> Result<Arc<dyn FhevmEngine>, EngineError> {
        log::debug!("connecting to gateway at {}", self.address);
        let (engine, keys) = GatewayEngine::connect(&self.address).await?;
        if keys.chain_id != config.chain_id {
            return Err(format!(
                "gateway serves chain {} but the client resolved chain {}",
                keys.chain_id, config.chain_id
            )
            .into());
        }
        Ok(Arc::new(engine))
    }
}
