//! JSON surface of the demo gateway.
//!
//! Field names are camelCase to match what a browser dApp would send. Every
//! operation answers with the [`ApiResponse`] envelope; protocol errors are
//! reported inside the envelope, never by dropping the connection.

use serde::{Deserialize, Serialize};

use crate::types::{DecryptedValue, FheType};

/// Response envelope shared by every gateway operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// A plaintext JSON value: boolean or integer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum PlainValue {
    Bool(bool),
    Uint(u64),
    Int(i64),
}

impl PlainValue {
    /// Numeric view; `None` for booleans.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            PlainValue::Bool(_) => None,
            PlainValue::Uint(v) => Some(*v as i128),
            PlainValue::Int(v) => Some(*v as i128),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlainValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<DecryptedValue> for PlainValue {
    fn from(value: DecryptedValue) -> Self {
        match value {
            DecryptedValue::Ebool(v) => PlainValue::Bool(v),
            other => PlainValue::Uint(other.as_u64()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    pub value: PlainValue,
    pub contract_address: String,
    pub user_address: String,
    #[serde(rename = "type", default)]
    pub value_type: FheType,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncryptResponse {
    pub handle: String,
    pub proof: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    pub handle: String,
    pub contract_address: String,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecryptResponse {
    pub value: PlainValue,
    #[serde(rename = "type")]
    pub value_type: FheType,
}

/// Homomorphic operations the demo compute endpoint illustrates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComputeOperation {
    Add,
    Subtract,
    Multiply,
}

impl ComputeOperation {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(ComputeOperation::Add),
            "subtract" => Some(ComputeOperation::Subtract),
            "multiply" => Some(ComputeOperation::Multiply),
            _ => None,
        }
    }
}

impl core::fmt::Display for ComputeOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ComputeOperation::Add => f.write_str("add"),
            ComputeOperation::Subtract => f.write_str("subtract"),
            ComputeOperation::Multiply => f.write_str("multiply"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    pub operation: ComputeOperation,
    pub operand1: i64,
    pub operand2: i64,
    pub contract_address: String,
    pub user_address: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputeResponse {
    pub result_handle: String,
    pub proof: String,
    pub operation: ComputeOperation,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeysResponse {
    pub public_key: String,
    pub chain_id: u64,
    pub network: String,
}

/// One framed request to the gateway. The `op` tag selects the operation;
/// the operation's fields sit alongside it in the same JSON object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum GatewayRequest {
    Encrypt(EncryptRequest),
    Decrypt(DecryptRequest),
    Compute(ComputeRequest),
    Keys,
}
