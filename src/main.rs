//! mycm - MyCm social post generator daemon

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mycm::{Server, Settings};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MyCm HTTP server
#[derive(Parser, Debug)]
#[command(name = "mycm", version, about = "Serve the MyCm post generation API")]
struct Args {
    /// Address to listen on (overrides config)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// TOML config file (default: ./mycm.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mycm=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    info!(
        "Text provider: {:?}, image provider: {:?}",
        settings.text.provider, settings.image.provider
    );

    // Create and run server
    let server = Arc::new(Server::new(&settings)?);

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            signal_server.shutdown();
        }
    });

    server.run().await?;

    Ok(())
}
