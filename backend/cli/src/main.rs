mod config;
mod config_cmd;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info};

use wacapture_channels::BridgeGateway;
use wacapture_config::{config_file_path, load_and_prepare, WaCaptureConfig};
use wacapture_core::SessionGateway;
use wacapture_ingest::IngestionHandler;
use wacapture_logging::init_logger;
use wacapture_store::MongoMessageStore;

/// Events buffered between the bridge stream and the dispatcher.
const EVENT_BUFFER: usize = 256;

#[derive(Parser)]
#[command(name = "wacapture")]
#[command(about = "wacapture: archive WhatsApp media and revoked messages")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $WACAPTURE_CONFIG, then ./wacapture.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the bridge and start capturing (default)
    Run,
    /// Print the effective configuration with credentials masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let path = cli.config.unwrap_or_else(config_file_path);
    let prepared = load_and_prepare(&path)
        .await
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Config => config_cmd::run(&prepared),
        Commands::Run => {
            let logging = &prepared.config.logging;
            let _guard = init_logger(&logging.dir, &logging.level);
            prepared.log_warnings();
            info!(config = %path.display(), "Starting wacapture");
            run(prepared.config).await
        }
    }
}

async fn run(config: WaCaptureConfig) -> Result<()> {
    let store = match MongoMessageStore::connect(&config.store.uri, &config.store.collection).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Could not connect to the message store");
            return Err(e.into());
        }
    };
    info!(collection = %config.store.collection, "Connected to the message store");

    let gateway = Arc::new(BridgeGateway::new(config::bridge_config(&config)));
    let handler = Arc::new(IngestionHandler::new(
        gateway.clone(),
        store,
        config::media_writer(&config),
        config::handler_settings(&config),
    ));

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    match gateway.initialize(tx).await {
        Ok(()) => info!(gateway = gateway.name(), "INITIALIZED"),
        Err(e) => error!(gateway = gateway.name(), error = %e, "ERROR"),
    }

    tokio::select! {
        dispatched = wacapture_ingest::run(handler, rx) => {
            info!(dispatched, "Event stream ended");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
