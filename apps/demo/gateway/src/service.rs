//! Request handling for the demo gateway.
//!
//! Every operation answers with the `ApiResponse` envelope; malformed input
//! produces `{success: false, error}` rather than a dropped connection.

use serde::Serialize;
use sha2::{Digest, Sha256};

use common::api::{
    ApiResponse, ComputeOperation, ComputeRequest, ComputeResponse, DecryptRequest,
    DecryptResponse, EncryptRequest, EncryptResponse, GatewayRequest, KeysResponse, PlainValue,
};
use common::types::{DecryptedValue, EthAddress, FheType, TypedValue};
use common::validation;
use common::ValidationError;

use sdk::dev::DevEngine;
use sdk::engine::FhevmEngine;
use sdk::wallet::DecryptionAuthorization;

/// Gateway state shared across connections.
pub struct GatewayService {
    engine: DevEngine,
    network: String,
    chain_id: u64,
}

impl GatewayService {
    pub fn new(network: impl Into<String>, chain_id: u64) -> Self {
        GatewayService {
            engine: DevEngine::new(chain_id),
            network: network.into(),
            chain_id,
        }
    }

    /// Parses one framed request and produces the JSON response body.
    pub async fn handle(&self, raw: &[u8]) -> Vec<u8> {
        let request: GatewayRequest = match serde_json::from_slice(raw) {
            Ok(request) => request,
            Err(e) => {
                return encode(&ApiResponse::<()>::err(format!("malformed request: {}", e)))
            }
        };
        log::debug!("handling {}", request_name(&request));
        match request {
            GatewayRequest::Encrypt(req) => encode(&self.encrypt(req).await),
            GatewayRequest::Decrypt(req) => encode(&self.decrypt(req).await),
            GatewayRequest::Compute(req) => encode(&self.compute(req).await),
            GatewayRequest::Keys => encode(&self.keys()),
        }
    }

    async fn encrypt(&self, request: EncryptRequest) -> ApiResponse<EncryptResponse> {
        let (contract, user) =
            match parse_addresses(&request.contract_address, &request.user_address) {
                Ok(pair) => pair,
                Err(e) => return ApiResponse::err(e.to_string()),
            };
        let value = match typed_value(request.value, request.value_type) {
            Ok(value) => value,
            Err(e) => return ApiResponse::err(e.to_string()),
        };

        match self.engine.encrypt(contract, user, &[value]).await {
            Ok(sealed) => ApiResponse::ok(
                EncryptResponse {
                    handle: format!("0x{}", hex::encode(sealed.handles[0])),
                    proof: sealed.input_proof,
                },
                "Value encrypted successfully",
            ),
            Err(e) => ApiResponse::err(format!("encryption failed: {}", e)),
        }
    }

    async fn decrypt(&self, request: DecryptRequest) -> ApiResponse<DecryptResponse> {
        let signature = match request.signature.as_deref() {
            Some(signature) if !signature.is_empty() => signature,
            _ => {
                return ApiResponse::err("Signature required for decryption authorization");
            }
        };
        let handle = match validation::parse_handle(&request.handle) {
            Ok(handle) => handle,
            Err(e) => return ApiResponse::err(e.to_string()),
        };
        let contract = match validation::parse_address(&request.contract_address) {
            Ok(contract) => contract,
            Err(e) => return ApiResponse::err(e.to_string()),
        };
        let signature = match hex::decode(signature.strip_prefix("0x").unwrap_or(signature)) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            _ => return ApiResponse::err("malformed authorization signature"),
        };

        let authorization = DecryptionAuthorization {
            signer: recover_signer(&signature),
            signature,
        };
        let value_type = self.engine.stored_type(&handle).unwrap_or_default();
        match self.engine.decrypt(contract, handle, &authorization).await {
            Ok(raw) => match DecryptedValue::from_raw(raw, value_type) {
                Ok(value) => ApiResponse::ok(
                    DecryptResponse {
                        value: value.into(),
                        value_type,
                    },
                    "Value decrypted successfully",
                ),
                Err(e) => ApiResponse::err(e.to_string()),
            },
            Err(e) => ApiResponse::err(format!("decryption failed: {}", e)),
        }
    }

    async fn compute(&self, request: ComputeRequest) -> ApiResponse<ComputeResponse> {
        let (contract, user) =
            match parse_addresses(&request.contract_address, &request.user_address) {
                Ok(pair) => pair,
                Err(e) => return ApiResponse::err(e.to_string()),
            };
        let operand1 = match validation::validate_uint64(request.operand1 as i128) {
            Ok(value) => value,
            Err(e) => return ApiResponse::err(e.to_string()),
        };
        let operand2 = match validation::validate_uint64(request.operand2 as i128) {
            Ok(value) => value,
            Err(e) => return ApiResponse::err(e.to_string()),
        };

        let result = match request.operation {
            ComputeOperation::Add => operand1.checked_add(operand2),
            ComputeOperation::Subtract => operand1.checked_sub(operand2),
            ComputeOperation::Multiply => operand1.checked_mul(operand2),
        };
        let result = match result {
            Some(result) => result,
            None => {
                return ApiResponse::err(format!(
                    "result of {} is out of the euint64 range",
                    request.operation
                ))
            }
        };

        match self
            .engine
            .encrypt(contract, user, &[TypedValue::Euint64(result)])
            .await
        {
            Ok(sealed) => ApiResponse::ok(
                ComputeResponse {
                    result_handle: format!("0x{}", hex::encode(sealed.handles[0])),
                    proof: sealed.input_proof,
                    operation: request.operation,
                },
                "Computation completed",
            ),
            Err(e) => ApiResponse::err(format!("computation failed: {}", e)),
        }
    }

    fn keys(&self) -> ApiResponse<KeysResponse> {
        ApiResponse::ok(
            KeysResponse {
                public_key: self.engine.public_key(),
                chain_id: self.chain_id,
                network: self.network.clone(),
            },
            "Key material",
        )
    }
}

fn parse_addresses(
    contract: &str,
    user: &str,
) -> Result<(EthAddress, EthAddress), ValidationError> {
    Ok((
        validation::parse_address(contract)?,
        validation::parse_address(user)?,
    ))
}

fn typed_value(value: PlainValue, ty: FheType) -> Result<TypedValue, ValidationError> {
    match (value, ty) {
        (PlainValue::Bool(b), FheType::Ebool) => Ok(TypedValue::Ebool(b)),
        (PlainValue::Bool(_), other) => Err(ValidationError::InvalidValue(format!(
            "expected a numeric value for {}",
            other
        ))),
        (value, ty) => {
            let numeric = value
                .as_i128()
                .ok_or_else(|| ValidationError::InvalidValue("value must be a number".into()))?;
            validation::validate_value(numeric, ty)
        }
    }
}

// Signer recovery stand-in: a real gateway recovers the address from the
// EIP-712 signature.
fn recover_signer(signature: &[u8]) -> EthAddress {
    let mut hasher = Sha256::new();
    hasher.update(b"fhevm-demo-recover");
    hasher.update(signature);
    let digest = hasher.finalize();
    let mut signer = [0u8; 20];
    signer.copy_from_slice(&digest[..20]);
    signer
}

fn request_name(request: &GatewayRequest) -> &'static str {
    match request {
        GatewayRequest::Encrypt(_) => "encrypt",
        GatewayRequest::Decrypt(_) => "decrypt",
        GatewayRequest::Compute(_) => "compute",
        GatewayRequest::Keys => "keys",
    }
}

fn encode<T: Serialize>(response: &ApiResponse<T>) -> Vec<u8> {
    serde_json::to_vec(response).unwrap_or_else(|_| {
        br#"{"success":false,"error":"internal serialization failure"}"#.to_vec()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x1111111111111111111111111111111111111111";
    const USER: &str = "0x2222222222222222222222222222222222222222";

    fn service() -> GatewayService {
        GatewayService::new("localhost", 31337)
    }

    async fn roundtrip<T: serde::de::DeserializeOwned>(
        service: &GatewayService,
        request: &GatewayRequest,
    ) -> ApiResponse<T> {
        let raw = serde_json::to_vec(request).unwrap();
        serde_json::from_slice(&service.handle(&raw).await).unwrap()
    }

    fn encrypt_request(value: PlainValue, ty: FheType) -> GatewayRequest {
        GatewayRequest::Encrypt(EncryptRequest {
            value,
            contract_address: CONTRACT.into(),
            user_address: USER.into(),
            value_type: ty,
        })
    }

    #[tokio::test]
    async fn test_encrypt_then_decrypt() {
        let service = service();
        let response: ApiResponse<EncryptResponse> = roundtrip(
            &service,
            &encrypt_request(PlainValue::Uint(7), FheType::Euint32),
        )
        .await;
        assert!(response.success);
        let data = response.data.unwrap();
        assert!(validation::is_handle(&data.handle));
        assert!(!data.proof.is_empty());

        let response: ApiResponse<DecryptResponse> = roundtrip(
            &service,
            &GatewayRequest::Decrypt(DecryptRequest {
                handle: data.handle,
                contract_address: CONTRACT.into(),
                signature: Some("0xdeadbeef".into()),
            }),
        )
        .await;
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.value, PlainValue::Uint(7));
        assert_eq!(data.value_type, FheType::Euint32);
    }

    #[tokio::test]
    async fn test_decrypt_without_signature_is_rejected() {
        let service = service();
        let handle = format!("0x{}", "ab".repeat(32));
        for signature in [None, Some(String::new())] {
            let response: ApiResponse<DecryptResponse> = roundtrip(
                &service,
                &GatewayRequest::Decrypt(DecryptRequest {
                    handle: handle.clone(),
                    contract_address: CONTRACT.into(),
                    signature,
                }),
            )
            .await;
            assert!(!response.success);
            assert!(response.error.unwrap().contains("Signature required"));
        }
    }

    #[tokio::test]
    async fn test_encrypt_rejects_out_of_range_values() {
        let service = service();
        let response: ApiResponse<EncryptResponse> = roundtrip(
            &service,
            &encrypt_request(PlainValue::Uint(256), FheType::Euint8),
        )
        .await;
        assert!(!response.success);

        let response: ApiResponse<EncryptResponse> = roundtrip(
            &service,
            &encrypt_request(PlainValue::Int(-1), FheType::Euint32),
        )
        .await;
        assert!(!response.success);

        // Boolean value against a numeric type.
        let response: ApiResponse<EncryptResponse> = roundtrip(
            &service,
            &encrypt_request(PlainValue::Bool(true), FheType::Euint32),
        )
        .await;
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_compute_and_overflow() {
        let service = service();
        let response: ApiResponse<ComputeResponse> = roundtrip(
            &service,
            &GatewayRequest::Compute(ComputeRequest {
                operation: ComputeOperation::Add,
                operand1: 2,
                operand2: 3,
                contract_address: CONTRACT.into(),
                user_address: USER.into(),
            }),
        )
        .await;
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.operation, ComputeOperation::Add);
        assert!(validation::is_handle(&data.result_handle));

        // 1 - 2 underflows the unsigned domain.
        let response: ApiResponse<ComputeResponse> = roundtrip(
            &service,
            &GatewayRequest::Compute(ComputeRequest {
                operation: ComputeOperation::Subtract,
                operand1: 1,
                operand2: 2,
                contract_address: CONTRACT.into(),
                user_address: USER.into(),
            }),
        )
        .await;
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_keys_reports_configuration() {
        let service = service();
        let response: ApiResponse<KeysResponse> = roundtrip(&service, &GatewayRequest::Keys).await;
        let data = response.data.unwrap();
        assert_eq!(data.chain_id, 31337);
        assert_eq!(data.network, "localhost");
        assert!(data.public_key.starts_with("0x"));
    }

    #[tokio::test]
    async fn test_malformed_request_is_an_envelope_error() {
        let service = service();
        let response: ApiResponse<()> =
            serde_json::from_slice(&service.handle(b"{not json").await).unwrap();
        assert!(!response.success);
        assert!(response.error.unwrap().contains("malformed request"));
    }
}
