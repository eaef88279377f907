//! Busy/error tracking around the two user-facing operations.
//!
//! These wrappers give a UI layer the bookkeeping it renders from: a busy
//! flag set for the duration of the call and the last error, kept alongside
//! the error returned to the caller. When the session has no ready client
//! the call is rejected immediately and the busy flag is never set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use common::types::{DecryptedValue, FheType};

use crate::client::FhevmClient;
use crate::errors::FhevmError;
use crate::input::EncryptedInputBuilder;
use crate::session::FhevmSession;

struct OpState {
    busy: AtomicBool,
    last_error: Mutex<Option<FhevmError>>,
}

impl OpState {
    fn new() -> Self {
        OpState {
            busy: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn last_error(&self) -> Option<FhevmError> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_error(&self, error: Option<FhevmError>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }
}

// Clears the busy flag on every exit path, including panics and early
// returns.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        BusyGuard(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn ready_client(session: &FhevmSession) -> Result<Arc<FhevmClient>, FhevmError> {
    session
        .client()
        .filter(|client| client.is_initialized())
        .ok_or(FhevmError::NotInitialized)
}

/// Tracked builder creation, bound to one contract address.
pub struct EncryptedInputAction {
    session: FhevmSession,
    contract_address: String,
    state: OpState,
}

impl EncryptedInputAction {
    pub fn new(session: FhevmSession, contract_address: impl Into<String>) -> Self {
        EncryptedInputAction {
            session,
            contract_address: contract_address.into(),
            state: OpState::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn last_error(&self) -> Option<FhevmError> {
        self.state.last_error()
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    /// Creates an encrypted input builder for `user_address`.
    pub async fn create_input(
        &self,
        user_address: &str,
    ) -> Result<EncryptedInputBuilder, FhevmError> {
        let client = ready_client(&self.session)?;
        self.state.set_error(None);
        let _busy = BusyGuard::set(&self.state.busy);

        let result = client.create_encrypted_input(&self.contract_address, user_address);
        if let Err(e) = &result {
            self.state.set_error(Some(e.clone()));
        }
        result
    }
}

/// Tracked decryption. Results are never cached; every call re-runs the
/// authorization flow.
pub struct DecryptAction {
    session: FhevmSession,
    state: OpState,
}

impl DecryptAction {
    pub fn new(session: FhevmSession) -> Self {
        DecryptAction {
            session,
            state: OpState::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn last_error(&self) -> Option<FhevmError> {
        self.state.last_error()
    }

    /// Decrypts `handle` from `contract_address` as the declared type.
    pub async fn decrypt(
        &self,
        handle: &str,
        contract_address: &str,
        expected: FheType,
    ) -> Result<DecryptedValue, FhevmError> {
        let client = ready_client(&self.session)?;
        self.state.set_error(None);
        let _busy = BusyGuard::set(&self.state.busy);

        let result = client.decrypt(handle, contract_address, expected).await;
        if let Err(e) = &result {
            self.state.set_error(Some(e.clone()));
        }
        result
    }
}
