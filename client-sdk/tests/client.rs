//! Client lifecycle and operation-boundary tests over the dev engine.

mod test_common;

use std::sync::Arc;

use fhevm_client_sdk::common::types::FheType;
use fhevm_client_sdk::config::ClientConfig;
use fhevm_client_sdk::dev::{DevEngineFactory, DevWallet};
use fhevm_client_sdk::errors::FhevmError;
use fhevm_client_sdk::FhevmClient;

use test_common::{CountingFactory, CountingWallet, FailingFactory, CONTRACT, USER};

fn dev_client(factory: Arc<dyn fhevm_client_sdk::engine::EngineFactory>) -> FhevmClient {
    FhevmClient::new(test_common::dev_config(), factory).expect("valid config")
}

#[tokio::test]
async fn test_operations_reject_before_init() {
    let client = dev_client(Arc::new(DevEngineFactory));
    assert!(!client.is_initialized());

    assert!(matches!(
        client.create_encrypted_input(CONTRACT, USER),
        Err(FhevmError::NotInitialized)
    ));
    let handle = format!("0x{}", "ab".repeat(32));
    assert!(matches!(
        client.decrypt(&handle, CONTRACT, FheType::Euint32).await,
        Err(FhevmError::NotInitialized)
    ));
    assert!(matches!(client.public_key(), Err(FhevmError::NotInitialized)));
    assert!(matches!(client.chain_id(), Err(FhevmError::NotInitialized)));
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let factory = Arc::new(CountingFactory::default());
    let client = dev_client(factory.clone());

    client.init().await.unwrap();
    assert!(client.is_initialized());
    client.init().await.unwrap();
    client.init().await.unwrap();

    // One engine, no matter how many times init is called.
    assert_eq!(factory.calls(), 1);
    assert_eq!(client.chain_id().unwrap(), 31337);
}

#[tokio::test]
async fn test_init_failure_is_wrapped_and_recoverable() {
    let client = dev_client(Arc::new(FailingFactory));
    let error = client.init().await.unwrap_err();

    match &error {
        FhevmError::Initialization { .. } => {}
        other => panic!("unexpected error: {:?}", other),
    }
    // The underlying cause is preserved.
    assert!(std::error::Error::source(&error).is_some());
    assert!(!client.is_initialized());

    // A failed init does not latch: the next attempt runs again.
    assert!(client.init().await.is_err());
}

#[tokio::test]
async fn test_explicit_chain_id_skips_network_query() {
    let wallet = Arc::new(CountingWallet::new(DevWallet::new(31337, b"w")));
    let config = ClientConfig::new(wallet.clone(), "localhost").with_chain_id(1234);
    let client = FhevmClient::new(config, Arc::new(DevEngineFactory)).unwrap();

    client.init().await.unwrap();
    assert_eq!(client.chain_id().unwrap(), 1234);
    assert_eq!(wallet.calls(), 0);
}

#[tokio::test]
async fn test_decrypt_validates_handle_before_any_network_call() {
    let wallet = Arc::new(CountingWallet::new(DevWallet::new(31337, b"w")));
    let config = ClientConfig::new(wallet.clone(), "localhost").with_chain_id(31337);
    let client = FhevmClient::new(config, Arc::new(DevEngineFactory)).unwrap();
    client.init().await.unwrap();
    let calls_after_init = wallet.calls();

    // Not 64 hex characters.
    let result = client.decrypt("0x1234", CONTRACT, FheType::Euint32).await;
    assert!(matches!(result, Err(FhevmError::Validation(_))));
    // Malformed contract address, valid handle.
    let handle = format!("0x{}", "ab".repeat(32));
    let result = client.decrypt(&handle, "0xnope", FheType::Euint32).await;
    assert!(matches!(result, Err(FhevmError::Validation(_))));

    // The wallet was never asked to sign.
    assert_eq!(wallet.calls(), calls_after_init);
}

#[tokio::test]
async fn test_create_input_validates_addresses() {
    let client = dev_client(Arc::new(DevEngineFactory));
    client.init().await.unwrap();

    assert!(matches!(
        client.create_encrypted_input("0x123", USER),
        Err(FhevmError::Validation(_))
    ));
    assert!(matches!(
        client.create_encrypted_input(CONTRACT, "not-an-address"),
        Err(FhevmError::Validation(_))
    ));
    assert!(client.create_encrypted_input(CONTRACT, USER).is_ok());
}

#[tokio::test]
async fn test_public_key_stable_across_calls() {
    let client = dev_client(Arc::new(DevEngineFactory));
    client.init().await.unwrap();
    assert_eq!(client.public_key().unwrap(), client.public_key().unwrap());
    assert!(client.public_key().unwrap().starts_with("0x"));
}

#[tokio::test]
async fn test_signer_address_passthrough() {
    let wallet = DevWallet::new(31337, b"signer");
    let expected = wallet.address();
    let config = ClientConfig::new(Arc::new(wallet), "localhost");
    let client = FhevmClient::new(config, Arc::new(DevEngineFactory)).unwrap();

    // Available without init; it is a plain provider query.
    assert_eq!(client.signer_address().await.unwrap(), expected);
}
