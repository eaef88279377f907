//! Core types shared between the SDK and the demo apps.
//!
//! Addresses, hashes and ciphertext handles are fixed byte arrays; they are
//! rendered as `0x`-prefixed lowercase hex at every API edge.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Ethereum-style address (20 bytes).
pub type EthAddress = [u8; 20];

/// 32-byte hash.
pub type Hash256 = [u8; 32];

/// Opaque reference to a ciphertext stored on-chain (32 bytes).
pub type Handle = [u8; 32];

/// The encrypted value types accepted by FHE-enabled contracts.
///
/// Serialized with the `euint*`/`ebool` names; the plain `uint*`/`bool`
/// spellings used by the JSON demo surface are accepted as aliases.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FheType {
    #[serde(rename = "euint8", alias = "uint8")]
    Euint8,
    #[serde(rename = "euint16", alias = "uint16")]
    Euint16,
    #[serde(rename = "euint32", alias = "uint32")]
    Euint32,
    #[serde(rename = "euint64", alias = "uint64")]
    Euint64,
    #[serde(rename = "ebool", alias = "bool")]
    Ebool,
}

impl FheType {
    /// Bit width of the plaintext domain.
    pub fn bits(self) -> u32 {
        match self {
            FheType::Euint8 => 8,
            FheType::Euint16 => 16,
            FheType::Euint32 => 32,
            FheType::Euint64 => 64,
            FheType::Ebool => 1,
        }
    }

    /// Largest plaintext value representable in this type.
    pub fn max_value(self) -> u64 {
        match self {
            FheType::Euint8 => u8::MAX as u64,
            FheType::Euint16 => u16::MAX as u64,
            FheType::Euint32 => u32::MAX as u64,
            FheType::Euint64 => u64::MAX,
            FheType::Ebool => 1,
        }
    }

    /// Canonical name, as used in serialized form.
    pub fn name(self) -> &'static str {
        match self {
            FheType::Euint8 => "euint8",
            FheType::Euint16 => "euint16",
            FheType::Euint32 => "euint32",
            FheType::Euint64 => "euint64",
            FheType::Ebool => "ebool",
        }
    }

    /// Parses either the canonical or the aliased spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "euint8" | "uint8" => Some(FheType::Euint8),
            "euint16" | "uint16" => Some(FheType::Euint16),
            "euint32" | "uint32" => Some(FheType::Euint32),
            "euint64" | "uint64" => Some(FheType::Euint64),
            "ebool" | "bool" => Some(FheType::Ebool),
            _ => None,
        }
    }
}

impl Default for FheType {
    // The demo surface defaults untyped values to 32-bit.
    fn default() -> Self {
        FheType::Euint32
    }
}

impl core::fmt::Display for FheType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A plaintext value tagged with the encrypted type it will become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedValue {
    Euint8(u8),
    Euint16(u16),
    Euint32(u32),
    Euint64(u64),
    Ebool(bool),
}

impl TypedValue {
    pub fn fhe_type(&self) -> FheType {
        match self {
            TypedValue::Euint8(_) => FheType::Euint8,
            TypedValue::Euint16(_) => FheType::Euint16,
            TypedValue::Euint32(_) => FheType::Euint32,
            TypedValue::Euint64(_) => FheType::Euint64,
            TypedValue::Ebool(_) => FheType::Ebool,
        }
    }

    /// The value widened to a raw `u64` (booleans as 0/1).
    pub fn raw(&self) -> u64 {
        match self {
            TypedValue::Euint8(v) => *v as u64,
            TypedValue::Euint16(v) => *v as u64,
            TypedValue::Euint32(v) => *v as u64,
            TypedValue::Euint64(v) => *v,
            TypedValue::Ebool(v) => *v as u64,
        }
    }
}

/// A decrypted value, range-checked against its declared type on
/// construction. The only way to build one is [`DecryptedValue::from_raw`],
/// so a value outside its declared domain is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptedValue {
    Euint8(u8),
    Euint16(u16),
    Euint32(u32),
    Euint64(u64),
    Ebool(bool),
}

impl DecryptedValue {
    /// Checks `raw` against the domain of `ty` and builds the typed value.
    pub fn from_raw(raw: u128, ty: FheType) -> Result<Self, ValidationError> {
        if raw > ty.max_value() as u128 {
            return Err(ValidationError::InvalidValue(format!(
                "decrypted value {} is out of range for {}",
                raw, ty
            )));
        }
        Ok(match ty {
            FheType::Euint8 => DecryptedValue::Euint8(raw as u8),
            FheType::Euint16 => DecryptedValue::Euint16(raw as u16),
            FheType::Euint32 => DecryptedValue::Euint32(raw as u32),
            FheType::Euint64 => DecryptedValue::Euint64(raw as u64),
            FheType::Ebool => DecryptedValue::Ebool(raw == 1),
        })
    }

    pub fn fhe_type(&self) -> FheType {
        match self {
            DecryptedValue::Euint8(_) => FheType::Euint8,
            DecryptedValue::Euint16(_) => FheType::Euint16,
            DecryptedValue::Euint32(_) => FheType::Euint32,
            DecryptedValue::Euint64(_) => FheType::Euint64,
            DecryptedValue::Ebool(_) => FheType::Ebool,
        }
    }

    /// The value widened to `u64` (booleans as 0/1).
    pub fn as_u64(&self) -> u64 {
        match self {
            DecryptedValue::Euint8(v) => *v as u64,
            DecryptedValue::Euint16(v) => *v as u64,
            DecryptedValue::Euint32(v) => *v as u64,
            DecryptedValue::Euint64(v) => *v,
            DecryptedValue::Ebool(v) => *v as u64,
        }
    }

    /// The boolean value, if this is an `ebool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecryptedValue::Ebool(v) => Some(*v),
            _ => None,
        }
    }
}

impl core::fmt::Display for DecryptedValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecryptedValue::Ebool(v) => write!(f, "{}", v),
            other => write!(f, "{}", other.as_u64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_bounds() {
        assert_eq!(
            DecryptedValue::from_raw(255, FheType::Euint8).unwrap(),
            DecryptedValue::Euint8(255)
        );
        assert!(DecryptedValue::from_raw(256, FheType::Euint8).is_err());
        assert_eq!(
            DecryptedValue::from_raw(1, FheType::Ebool).unwrap(),
            DecryptedValue::Ebool(true)
        );
        assert!(DecryptedValue::from_raw(2, FheType::Ebool).is_err());
        assert_eq!(
            DecryptedValue::from_raw(u64::MAX as u128, FheType::Euint64).unwrap(),
            DecryptedValue::Euint64(u64::MAX)
        );
        assert!(DecryptedValue::from_raw(u64::MAX as u128 + 1, FheType::Euint64).is_err());
    }

    #[test]
    fn test_decrypted_value_views() {
        let value = DecryptedValue::from_raw(0, FheType::Ebool).unwrap();
        assert_eq!(value.as_bool(), Some(false));
        assert_eq!(value.as_u64(), 0);
        let value = DecryptedValue::from_raw(9, FheType::Euint16).unwrap();
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_u64(), 9);
        assert_eq!(value.to_string(), "9");
        assert_eq!(DecryptedValue::Ebool(true).to_string(), "true");
    }

    #[test]
    fn test_fhe_type_names() {
        assert_eq!(FheType::from_name("euint32"), Some(FheType::Euint32));
        assert_eq!(FheType::from_name("uint32"), Some(FheType::Euint32));
        assert_eq!(FheType::from_name("bool"), Some(FheType::Ebool));
        assert_eq!(FheType::from_name("euint128"), None);
        assert_eq!(FheType::Euint8.name(), "euint8");
    }

    #[test]
    fn test_fhe_type_serde_aliases() {
        let ty: FheType = serde_json::from_str("\"uint8\"").unwrap();
        assert_eq!(ty, FheType::Euint8);
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"euint8\"");
    }
}
