//! Client SDK for building dApps on FHE-enabled smart contracts.
//!
//! The SDK wraps an external FHE encryption engine and an external wallet
//! connection behind explicit traits, and manages the lifecycle around them:
//!
//! - [`FhevmClient`] owns one engine instance and exposes the encrypted-input
//!   and decryption operations.
//! - [`FhevmSession`] owns one client at a time, re-initializing it whenever
//!   a new configuration is supplied.
//! - [`tracked`] wraps the two user-facing operations with the busy/error
//!   bookkeeping a UI layer needs.
//!
//! The cryptography itself is out of scope: the production FHE library is
//! one [`engine::FhevmEngine`] implementation, and [`dev`] ships a
//! deterministic stand-in for demos and tests.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fhevm_client_sdk::config::ClientConfig;
//! use fhevm_client_sdk::dev::{DevEngineFactory, DevWallet};
//! use fhevm_client_sdk::FhevmClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(DevWallet::new(31337, b"example"));
//! let config = ClientConfig::new(provider, "localhost");
//! let client = FhevmClient::new(config, Arc::new(DevEngineFactory))?;
//! client.init().await?;
//!
//! let mut input = client.create_encrypted_input(
//!     "0x1111111111111111111111111111111111111111",
//!     "0x2222222222222222222222222222222222222222",
//! )?;
//! input.add32(42);
//! let sealed = input.seal().await?;
//! assert_eq!(sealed.handles.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod comm;
pub mod config;
pub mod dev;
pub mod engine;
pub mod errors;
pub mod input;
pub mod session;
pub mod tracked;
pub mod wallet;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use client::FhevmClient;
pub use config::ClientConfig;
pub use errors::FhevmError;
pub use session::{FhevmSession, SessionStatus};

// Re-export the shared types crate.
pub use common;
