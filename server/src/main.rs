//! Hydrodash listing API server
//!
//! Serves the users and devices listings for the admin dashboard from a
//! SQLite database.
//!
//! Usage:
//!   hydrodash-server --port 8080 --database hydrodash.db
//!   hydrodash-server --seed-demo            # in-memory, with demo rows

use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use hydrodash_listing::ListingConfig;
use hydrodash_server::{build_router, ServerConfig};
use hydrodash_storage::{seed_demo, SqliteRecordStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

const IN_MEMORY: &str = ":memory:";

#[derive(Parser, Debug)]
#[command(name = "hydrodash-server")]
#[command(about = "Hydrodash admin dashboard listing API")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// SQLite database path (`:memory:` for a throwaway store)
    #[arg(short, long, default_value = IN_MEMORY)]
    database: String,

    /// Page size when a request names none
    #[arg(long, default_value = "10")]
    per_page: u64,

    /// Largest page size a client may request
    #[arg(long, default_value = "100")]
    max_per_page: u64,

    /// Insert demo users and devices on startup
    #[arg(long)]
    seed_demo: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let fallback = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .compact()
        .init();

    let store = if args.database == IN_MEMORY {
        SqliteRecordStore::open_in_memory()
    } else {
        SqliteRecordStore::open(&args.database)
    }
    .with_context(|| format!("Failed to open database {}", args.database))?;
    info!(database = %args.database, "store opened");

    if args.seed_demo {
        seed_demo(&store).context("Failed to seed demo data")?;
        info!("demo users and devices seeded");
    }

    let config = ServerConfig {
        listing: ListingConfig {
            default_per_page: args.per_page,
            max_per_page: args.max_per_page,
        },
    };
    let app = build_router(Arc::new(store), config);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", args.port))?;
    info!(port = args.port, "Hydrodash listing API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    info!("Hydrodash listing API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler the server runs until killed.
        std::future::pending::<()>().await;
    }
}
