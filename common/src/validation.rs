//! Pure validation helpers for values, addresses and handles.
//!
//! These run before anything touches the network: a value that fails here is
//! rejected with a descriptive error and no engine or provider call is made.

use crate::error::ValidationError;
use crate::types::{EthAddress, FheType, Handle, Hash256, TypedValue};

/// Checks that `value` fits the unsigned domain of `ty` and returns it as
/// the matching [`TypedValue`]. Booleans are accepted as 0/1.
pub fn validate_value(value: i128, ty: FheType) -> Result<TypedValue, ValidationError> {
    let raw = validate_unsigned(value, ty)?;
    Ok(match ty {
        FheType::Euint8 => TypedValue::Euint8(raw as u8),
        FheType::Euint16 => TypedValue::Euint16(raw as u16),
        FheType::Euint32 => TypedValue::Euint32(raw as u32),
        FheType::Euint64 => TypedValue::Euint64(raw),
        FheType::Ebool => TypedValue::Ebool(raw == 1),
    })
}

fn validate_unsigned(value: i128, ty: FheType) -> Result<u64, ValidationError> {
    let max = ty.max_value() as i128;
    if value < 0 || value > max {
        return Err(ValidationError::InvalidValue(format!(
            "invalid {} value: {}; must be an integer between 0 and {}",
            ty, value, max
        )));
    }
    Ok(value as u64)
}

/// Range check for the 8-bit unsigned domain.
pub fn validate_uint8(value: i128) -> Result<u8, ValidationError> {
    validate_unsigned(value, FheType::Euint8).map(|v| v as u8)
}

/// Range check for the 16-bit unsigned domain.
pub fn validate_uint16(value: i128) -> Result<u16, ValidationError> {
    validate_unsigned(value, FheType::Euint16).map(|v| v as u16)
}

/// Range check for the 32-bit unsigned domain.
pub fn validate_uint32(value: i128) -> Result<u32, ValidationError> {
    validate_unsigned(value, FheType::Euint32).map(|v| v as u32)
}

/// Range check for the 64-bit unsigned domain.
pub fn validate_uint64(value: i128) -> Result<u64, ValidationError> {
    validate_unsigned(value, FheType::Euint64)
}

fn is_prefixed_hex(s: &str, digits: usize) -> bool {
    match s.strip_prefix("0x") {
        Some(body) => body.len() == digits && body.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// True for exactly `0x` followed by 40 hex characters.
pub fn is_address(s: &str) -> bool {
    is_prefixed_hex(s, 40)
}

/// True for exactly `0x` followed by 64 hex characters.
pub fn is_transaction_hash(s: &str) -> bool {
    is_prefixed_hex(s, 64)
}

/// Ciphertext handles share the transaction-hash shape.
pub fn is_handle(s: &str) -> bool {
    is_prefixed_hex(s, 64)
}

/// Parses a `0x`-prefixed address string into its 20 bytes.
pub fn parse_address(s: &str) -> Result<EthAddress, ValidationError> {
    if !is_address(s) {
        return Err(ValidationError::InvalidAddress(format!(
            "invalid address: {}",
            s
        )));
    }
    let bytes = hex::decode(&s[2..])
        .map_err(|_| ValidationError::InvalidAddress(format!("invalid address: {}", s)))?;
    let mut address = [0u8; 20];
    address.copy_from_slice(&bytes);
    Ok(address)
}

/// Parses a `0x`-prefixed handle string into its 32 bytes.
pub fn parse_handle(s: &str) -> Result<Handle, ValidationError> {
    if !is_handle(s) {
        return Err(ValidationError::InvalidHandle(format!(
            "invalid handle: {}; expected 0x followed by 64 hex characters",
            s
        )));
    }
    let bytes = hex::decode(&s[2..])
        .map_err(|_| ValidationError::InvalidHandle(format!("invalid handle: {}", s)))?;
    let mut handle = [0u8; 32];
    handle.copy_from_slice(&bytes);
    Ok(handle)
}

/// Parses a `0x`-prefixed 32-byte hash string.
pub fn parse_hash(s: &str) -> Result<Hash256, ValidationError> {
    if !is_transaction_hash(s) {
        return Err(ValidationError::InvalidHash(format!("invalid hash: {}", s)));
    }
    let bytes = hex::decode(&s[2..])
        .map_err(|_| ValidationError::InvalidHash(format!("invalid hash: {}", s)))?;
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

/// Canonical (lowercase) form of an address string.
pub fn normalize_address(s: &str) -> Result<String, ValidationError> {
    if !is_address(s) {
        return Err(ValidationError::InvalidAddress(format!(
            "invalid address: {}",
            s
        )));
    }
    Ok(s.to_lowercase())
}
