//! Demonstration decryption gateway.
//!
//! Serves the SDK's JSON demo surface (encrypt / decrypt / compute / keys)
//! over length-prefixed TCP frames. Everything cryptographic is the SDK's
//! dev engine: handles and proofs are fabricated and values are remembered
//! server-side, which is exactly what the original demo API routes do. Do
//! not mistake this for a real gateway; in production, encryption happens
//! client-side.

pub mod server;
pub mod service;

pub use server::serve;
pub use service::GatewayService;
