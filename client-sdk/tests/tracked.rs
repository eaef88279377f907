//! Busy/error contract of the tracked operations.

mod test_common;

use std::sync::Arc;

use fhevm_client_sdk::common::types::{DecryptedValue, FheType};
use fhevm_client_sdk::dev::DevEngineFactory;
use fhevm_client_sdk::errors::FhevmError;
use fhevm_client_sdk::session::FhevmSession;
use fhevm_client_sdk::tracked::{DecryptAction, EncryptedInputAction};

use test_common::{CONTRACT, USER};

async fn ready_session() -> FhevmSession {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    session.set_config(test_common::dev_config()).await.unwrap();
    session
}

#[tokio::test]
async fn test_rejects_without_ready_client_and_stays_idle() {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    let action = EncryptedInputAction::new(session.clone(), CONTRACT);

    let result = action.create_input(USER).await;
    assert!(matches!(result, Err(FhevmError::NotInitialized)));
    // The busy flag was never touched.
    assert!(!action.is_busy());

    let decrypt = DecryptAction::new(session);
    let handle = format!("0x{}", "ab".repeat(32));
    assert!(matches!(
        decrypt.decrypt(&handle, CONTRACT, FheType::Euint32).await,
        Err(FhevmError::NotInitialized)
    ));
    assert!(!decrypt.is_busy());
}

#[tokio::test]
async fn test_create_input_success_clears_busy_and_error() {
    let session = ready_session().await;
    let action = EncryptedInputAction::new(session, CONTRACT);

    assert_eq!(action.contract_address(), CONTRACT);
    let builder = action.create_input(USER).await.unwrap();
    assert_eq!(builder.len(), 0);
    assert!(!action.is_busy());
    assert!(action.last_error().is_none());
}

#[tokio::test]
async fn test_create_input_failure_records_error_and_clears_busy() {
    let session = ready_session().await;
    let action = EncryptedInputAction::new(session, "0xnot-an-address");

    let result = action.create_input(USER).await;
    assert!(matches!(result, Err(FhevmError::Validation(_))));
    assert!(!action.is_busy());
    assert!(matches!(
        action.last_error(),
        Some(FhevmError::Validation(_))
    ));
}

#[tokio::test]
async fn test_error_state_resets_on_next_attempt() {
    let session = ready_session().await;
    let action = EncryptedInputAction::new(session, CONTRACT);

    // First attempt fails on the user address and is recorded.
    assert!(action.create_input("0xbad").await.is_err());
    assert!(action.last_error().is_some());

    // A successful attempt clears the recorded error.
    assert!(action.create_input(USER).await.is_ok());
    assert!(action.last_error().is_none());
}

#[tokio::test]
async fn test_decrypt_action_round_trip() {
    let session = ready_session().await;
    let client = session.client().unwrap();

    let mut input = client.create_encrypted_input(CONTRACT, USER).unwrap();
    input.add8(42);
    let sealed = input.seal().await.unwrap();
    let handle = format!("0x{}", hex::encode(sealed.handles[0]));

    let action = DecryptAction::new(session);
    let value = action.decrypt(&handle, CONTRACT, FheType::Euint8).await.unwrap();
    assert_eq!(value, DecryptedValue::Euint8(42));
    assert!(!action.is_busy());
    assert!(action.last_error().is_none());
}

#[tokio::test]
async fn test_decrypt_action_records_failures() {
    let session = ready_session().await;
    let action = DecryptAction::new(session);

    // Malformed handle: fails validation, recorded, busy cleared.
    let result = action.decrypt("0x12", CONTRACT, FheType::Euint8).await;
    assert!(matches!(result, Err(FhevmError::Validation(_))));
    assert!(!action.is_busy());
    assert!(action.last_error().is_some());
}
