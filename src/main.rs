//! Inventory tracking API (v1)
//!
//! A REST API over a MongoDB collection of inventory items, plus the static
//! browser client that drives it.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser / inventory-cli
//!            │
//!            ▼
//!   ┌─────────────────┐    ┌────────────────┐    ┌───────────┐    ┌───────────┐
//!   │  http::server   │───▶│ http::handlers │───▶│   items   │───▶│   store   │──▶ MongoDB
//!   │ CORS, req-id,   │    │ JSON in/out,   │    │ repository│    │ connector │
//!   │ trace, limits   │    │ error mapping  │    │ validation│    │ (memoized)│
//!   └─────────────────┘    └────────────────┘    └───────────┘    └───────────┘
//!            │
//!            └──▶ static client (public/)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use inventory_api::config;
use inventory_api::lifecycle::Shutdown;
use inventory_api::observability::{logging, metrics};
use inventory_api::store::{Connector, ItemStore, MemoryStore, MongoStore};
use inventory_api::HttpServer;

#[derive(Parser)]
#[command(name = "inventory-api")]
#[command(about = "REST API and web client for inventory items", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "INVENTORY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:5000).
    #[arg(short, long)]
    bind: Option<String>,

    /// Keep items in process memory instead of MongoDB.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("inventory-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        collection = %config.database.collection,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let store: Arc<dyn ItemStore> = if args.in_memory {
        tracing::warn!("Using in-memory store; items are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let connector = Connector::new(config.database.clone());
        // A missing connection string is fatal; an unreachable store is not,
        // requests will report it and the next one reconnects.
        let database = connector.database_name()?;
        let store = MongoStore::new(connector);
        if let Err(e) = store.ping().await {
            tracing::error!(database = %database, error = %e, "Initial MongoDB connection failed");
        }
        Arc::new(store)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
