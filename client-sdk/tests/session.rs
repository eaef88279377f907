//! Session state-machine and re-initialization tests.

mod test_common;

use std::sync::Arc;

use fhevm_client_sdk::config::ClientConfig;
use fhevm_client_sdk::dev::{DevEngineFactory, DevWallet};
use fhevm_client_sdk::errors::FhevmError;
use fhevm_client_sdk::session::{FhevmSession, SessionStatus};

use test_common::{FailingFactory, SlowFirstFactory};

fn config_with_chain(chain_id: u64) -> ClientConfig {
    ClientConfig::new(Arc::new(DevWallet::new(chain_id, b"session-test")), "localhost")
        .with_chain_id(chain_id)
}

#[tokio::test]
async fn test_lifecycle_to_ready() {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    assert_eq!(session.status(), SessionStatus::Uninitialized);
    assert!(session.client().is_none());

    let handle = session.set_config(test_common::dev_config());
    assert_eq!(session.status(), SessionStatus::Initializing);
    handle.await.unwrap();

    assert_eq!(session.status(), SessionStatus::Ready);
    let client = session.client().expect("client after ready");
    assert!(client.is_initialized());
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_lifecycle_to_failed() {
    let session = FhevmSession::new(Arc::new(FailingFactory));
    session.set_config(test_common::dev_config()).await.unwrap();

    assert_eq!(session.status(), SessionStatus::Failed);
    assert!(session.client().is_none());
    assert!(matches!(
        session.error(),
        Some(FhevmError::Initialization { .. })
    ));

    // wait_ready surfaces the recorded error.
    assert!(session.wait_ready().await.is_err());
}

#[tokio::test]
async fn test_wait_ready_returns_client() {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    let _ = session.set_config(test_common::dev_config());
    let client = session.wait_ready().await.unwrap();
    assert!(client.is_initialized());
}

#[tokio::test]
async fn test_wait_ready_without_config() {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    assert!(matches!(
        session.wait_ready().await,
        Err(FhevmError::NotInitialized)
    ));
}

#[tokio::test]
async fn test_shutdown_clears_state() {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    session.set_config(test_common::dev_config()).await.unwrap();
    assert_eq!(session.status(), SessionStatus::Ready);

    session.shutdown();
    assert_eq!(session.status(), SessionStatus::Uninitialized);
    assert!(session.client().is_none());
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_reconfigure_replaces_client() {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    session.set_config(config_with_chain(1)).await.unwrap();
    assert_eq!(session.client().unwrap().chain_id().unwrap(), 1);

    session.set_config(config_with_chain(2)).await.unwrap();
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.client().unwrap().chain_id().unwrap(), 2);
}

#[tokio::test]
async fn test_stale_initialization_is_discarded() {
    // The first initialization stalls inside the factory; the second one
    // overtakes it and must win. When the first finally settles, its result
    // is discarded instead of overwriting the newer client.
    let session = FhevmSession::new(Arc::new(SlowFirstFactory::default()));

    let slow = session.set_config(config_with_chain(1));
    let fast = session.set_config(config_with_chain(2));

    fast.await.unwrap();
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.client().unwrap().chain_id().unwrap(), 2);

    slow.await.unwrap();
    // Still the second config's client.
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.client().unwrap().chain_id().unwrap(), 2);
}

#[tokio::test]
async fn test_shutdown_discards_in_flight_initialization() {
    let session = FhevmSession::new(Arc::new(SlowFirstFactory::default()));
    let inflight = session.set_config(config_with_chain(1));
    session.shutdown();

    inflight.await.unwrap();
    assert_eq!(session.status(), SessionStatus::Uninitialized);
    assert!(session.client().is_none());
}

#[tokio::test]
async fn test_status_watch_sees_transitions() {
    let session = FhevmSession::new(Arc::new(DevEngineFactory));
    let mut rx = session.subscribe();
    assert_eq!(*rx.borrow_and_update(), SessionStatus::Uninitialized);

    let _ = session.set_config(test_common::dev_config());
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SessionStatus::Initializing);

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SessionStatus::Ready);
}
