//! TCP accept loop for the gateway.
//!
//! One task per connection; frames on a connection are handled in order.

use std::io;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};

use sdk::comm;

use crate::service::GatewayService;

/// Runs the gateway on an already-bound listener until the listener fails.
///
/// Binding is left to the caller so tests can use an ephemeral port.
pub async fn serve(service: Arc<GatewayService>, listener: TcpListener) -> io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        log::debug!("connection from {}", peer);
        let service = service.clone();
        tokio::spawn(async move {
            match handle_connection(service, stream).await {
                Ok(()) => log::debug!("connection from {} closed", peer),
                Err(e) => log::debug!("connection from {} failed: {}", peer, e),
            }
        });
    }
}

async fn handle_connection(service: Arc<GatewayService>, mut stream: TcpStream) -> io::Result<()> {
    loop {
        let raw = match comm::read_frame(&mut stream).await {
            Ok(raw) => raw,
            // A clean disconnect between frames.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        };
        let response = service.handle(&raw).await;
        comm::write_frame(&mut stream, &response).await?;
    }
}
