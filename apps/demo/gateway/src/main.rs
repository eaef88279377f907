//! Demo gateway binary.
//!
//! ```bash
//! fhevm_demo_gateway --listen 127.0.0.1:8572 --network localhost
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use fhevm_demo_gateway::{serve, GatewayService};

#[derive(Parser)]
#[command(name = "fhevm-demo-gateway", about = "Run the FHEVM demo gateway")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8572")]
    listen: String,

    /// Network label reported by the keys operation
    #[arg(long, default_value = "localhost")]
    network: String,

    /// Chain id; defaults to the named network's id
    #[arg(long)]
    chain_id: Option<u64>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let chain_id = match args
        .chain_id
        .or_else(|| sdk::config::known_network(&args.network).map(|n| n.chain_id))
    {
        Some(chain_id) => chain_id,
        None => {
            eprintln!(
                "Unknown network '{}'; pass --chain-id explicitly.",
                args.network
            );
            std::process::exit(1);
        }
    };

    let listener = TcpListener::bind(&args.listen).await?;
    log::info!(
        "demo gateway for '{}' (chain {}) listening on {}",
        args.network,
        chain_id,
        listener.local_addr()?
    );

    serve(Arc::new(GatewayService::new(args.network, chain_id)), listener).await?;
    Ok(())
}
