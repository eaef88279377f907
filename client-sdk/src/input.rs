//! Encrypted input builder.

use std::sync::Arc;

use common::types::{EthAddress, FheType, Handle, TypedValue};
use common::validation;

use crate::engine::FhevmEngine;
use crate::errors::FhevmError;

/// Result of sealing an encrypted input: one handle per added value plus a
/// single inclusion proof the receiving contract verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedInput {
    pub handles: Vec<Handle>,
    pub input_proof: String,
}

/// Accumulates typed plaintext values for one `(contract, user)` pair.
///
/// The terminal [`seal`](Self::seal) consumes the builder, so a sealed
/// input can never be reused.
pub struct EncryptedInputBuilder {
    engine: Arc<dyn FhevmEngine>,
    contract: EthAddress,
    user: EthAddress,
    values: Vec<TypedValue>,
}

impl EncryptedInputBuilder {
    pub(crate) fn new(engine: Arc<dyn FhevmEngine>, contract: EthAddress, user: EthAddress) -> Self {
        EncryptedInputBuilder {
            engine,
            contract,
            user,
            values: Vec::new(),
        }
    }

    /// Adds an 8-bit unsigned integer.
    pub fn add8(&mut self, value: u8) -> &mut Self {
        self.values.push(TypedValue::Euint8(value));
        self
    }

    /// Adds a 16-bit unsigned integer.
    pub fn add16(&mut self, value: u16) -> &mut Self {
        self.values.push(TypedValue::Euint16(value));
        self
    }

    /// Adds a 32-bit unsigned integer.
    pub fn add32(&mut self, value: u32) -> &mut Self {
        self.values.push(TypedValue::Euint32(value));
        self
    }

    /// Adds a 64-bit unsigned integer.
    pub fn add64(&mut self, value: u64) -> &mut Self {
        self.values.push(TypedValue::Euint64(value));
        self
    }

    /// Adds a boolean.
    pub fn add_bool(&mut self, value: bool) -> &mut Self {
        self.values.push(TypedValue::Ebool(value));
        self
    }

    /// Range-checked add for values arriving untyped (CLI input, JSON).
    pub fn add_plain(&mut self, value: i128, ty: FheType) -> Result<&mut Self, FhevmError> {
        let typed = validation::validate_value(value, ty)?;
        self.values.push(typed);
        Ok(self)
    }

    /// Adds a batch of already-typed values.
    pub fn add_values(&mut self, values: &[TypedValue]) -> &mut Self {
        self.values.extend_from_slice(values);
        self
    }

    /// Adds each byte as an 8-bit value.
    pub fn add_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.values.extend(bytes.iter().map(|b| TypedValue::Euint8(*b)));
        self
    }

    /// Number of values added so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Contract this input is bound to.
    pub fn contract_address(&self) -> EthAddress {
        self.contract
    }

    /// User this input is bound to.
    pub fn user_address(&self) -> EthAddress {
        self.user
    }

    /// Encrypts the accumulated values through the engine.
    pub async fn seal(self) -> Result<SealedInput, FhevmError> {
        if self.values.is_empty() {
            return Err(FhevmError::encryption("no values were added to the input"));
        }
        self.engine
            .encrypt(self.contract, self.user, &self.values)
            .await
            .map_err(|e| FhevmError::encryption_with("engine rejected the input", e))
    }
}
