//! Session owning the client lifecycle.
//!
//! A session is the dependency-injected replacement for a UI framework's
//! context/provider: whoever owns the application tree owns the session and
//! hands clones of it to the parts that need the client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::FhevmClient;
use crate::config::ClientConfig;
use crate::engine::EngineFactory;
use crate::errors::FhevmError;

/// Lifecycle states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

struct SessionState {
    client: Option<Arc<FhevmClient>>,
    last_error: Option<FhevmError>,
}

struct SessionInner {
    factory: Arc<dyn EngineFactory>,
    // Bumped on every set_config/shutdown; an initialization may only
    // commit while its generation is still the current one.
    generation: AtomicU64,
    state: Mutex<SessionState>,
    status: watch::Sender<SessionStatus>,
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns one [`FhevmClient`] at a time and re-initializes it whenever a new
/// configuration is supplied.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct FhevmSession {
    inner: Arc<SessionInner>,
}

impl FhevmSession {
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Uninitialized);
        FhevmSession {
            inner: Arc::new(SessionInner {
                factory,
                generation: AtomicU64::new(0),
                state: Mutex::new(SessionState {
                    client: None,
                    last_error: None,
                }),
                status,
            }),
        }
    }

    /// Supplies a configuration and starts initialization on a background
    /// task.
    ///
    /// A previous client is torn down immediately. An initialization still
    /// in flight is disowned: when it settles, its generation no longer
    /// matches and its result is discarded rather than committed.
    ///
    /// The returned handle resolves when the initialization attempt settles
    /// (committed or discarded); awaiting it is optional. Must be called
    /// from within a Tokio runtime.
    pub fn set_config(&self, config: ClientConfig) -> JoinHandle<()> {
        let inner = self.inner.clone();
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = lock(&inner.state);
            state.client = None;
            state.last_error = None;
            inner.status.send_replace(SessionStatus::Initializing);
        }
        log::debug!("session initializing, generation {}", generation);

        tokio::spawn(async move {
            let outcome = match FhevmClient::new(config, inner.factory.clone()) {
                Ok(client) => client.init().await.map(|()| Arc::new(client)),
                Err(e) => Err(e),
            };

            let mut state = lock(&inner.state);
            if inner.generation.load(Ordering::SeqCst) != generation {
                log::debug!("discarding stale initialization, generation {}", generation);
                return;
            }
            match outcome {
                Ok(client) => {
                    state.client = Some(client);
                    inner.status.send_replace(SessionStatus::Ready);
                }
                Err(e) => {
                    log::debug!("initialization failed: {}", e);
                    state.last_error = Some(e);
                    inner.status.send_replace(SessionStatus::Failed);
                }
            }
        })
    }

    /// Tears the session down. Any in-flight initialization is discarded.
    pub fn shutdown(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = lock(&self.inner.state);
        state.client = None;
        state.last_error = None;
        self.inner.status.send_replace(SessionStatus::Uninitialized);
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        *self.inner.status.borrow()
    }

    /// Watches lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.inner.status.subscribe()
    }

    /// The current client, if the session is ready.
    pub fn client(&self) -> Option<Arc<FhevmClient>> {
        lock(&self.inner.state).client.clone()
    }

    /// The error recorded by the most recent failed initialization.
    pub fn error(&self) -> Option<FhevmError> {
        lock(&self.inner.state).last_error.clone()
    }

    /// Waits for the in-flight initialization to settle.
    ///
    /// Resolves with the client once `Ready`, or with the recorded error on
    /// `Failed`. Returns [`FhevmError::NotInitialized`] if no configuration
    /// was ever supplied.
    pub async fn wait_ready(&self) -> Result<Arc<FhevmClient>, FhevmError> {
        let mut rx = self.subscribe();
        loop {
            let status = *rx.borrow_and_update();
            match status {
                SessionStatus::Ready => {
                    if let Some(client) = self.client() {
                        return Ok(client);
                    }
                    // Torn down between the status read and the state read;
                    // keep watching.
                }
                SessionStatus::Failed => {
                    return Err(self.error().unwrap_or(FhevmError::NotInitialized));
                }
                SessionStatus::Uninitialized => return Err(FhevmError::NotInitialized),
                SessionStatus::Initializing => {}
            }
            if rx.changed().await.is_err() {
                return Err(FhevmError::NotInitialized);
            }
        }
    }
}
