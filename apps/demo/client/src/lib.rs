//! Demo client library.
//!
//! Wires an [`sdk::FhevmSession`] to the demo gateway: the gateway-backed
//! engine implementation lives in [`gateway`], and [`DemoApp`] holds the
//! session plus the tracked operations a UI layer would render from.
//!
//! # Example
//!
//! ```no_run
//! use fhevm_demo_client::DemoApp;
//! use sdk::common::types::FheType;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let app = DemoApp::new("127.0.0.1:8572", "localhost", 31337);
//! app.init().await?;
//! let sealed = app
//!     .encrypt("0x1111111111111111111111111111111111111111", None, 7, FheType::Euint32)
//!     .await?;
//! println!("handle: 0x{}", hex::encode(sealed.handles[0]));
//! # Ok(())
//! # }
//! ```

mod app;
pub mod gateway;

pub use app::DemoApp;
pub use gateway::{GatewayConnection, GatewayEngine, GatewayEngineFactory};
