use anyhow::Result;
use clap::Parser;
use flare_core::IceServerConfig;
use flare_server::{RelayService, app};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flare-server", about = "WebRTC signaling relay")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:5000")]
    listen: SocketAddr,

    /// STUN/TURN server urls advertised to clients.
    #[arg(long = "ice-url", default_value = "stun:stun.l.google.com:19302")]
    ice_urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let ice_servers = vec![IceServerConfig {
        urls: args.ice_urls,
        username: None,
        credential: None,
    }];
    let service = RelayService::new(ice_servers);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("Signaling relay listening on {}", args.listen);
    axum::serve(listener, app(service)).await?;

    Ok(())
}
