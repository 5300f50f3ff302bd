//! airlog - Radio play log service
//!
//! Logs played songs, serves the log over REST, and relays "now playing"
//! metadata to Last.fm, TuneIn and Icecast after the broadcast delay.

use airlog::publish::Publishers;
use airlog::{build_router, AppState};
use airlog_common::config::AppConfig;
use airlog_common::time::BroadcastClock;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "airlog", about = "Radio play log service", version)]
struct Args {
    /// Path to the TOML config file (falls back to AIRLOG_CONFIG, then the
    /// platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting airlog v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;

    let tz = config.broadcast_tz()?;
    let clock = BroadcastClock::new(tz);
    info!("Broadcast timezone: {}", config.timezone);

    let pool = airlog::db::init_database(&config.database).await?;

    let publishers = Arc::new(Publishers::from_config(&config)?);
    let targets = publishers.enabled_targets();
    if targets.is_empty() {
        warn!("No publish targets configured; songs will be logged but not relayed");
    } else {
        info!("Publish targets: {}", targets.join(", "));
    }

    if config.auth.is_none() {
        warn!("No [auth] credentials configured; write endpoints are unprotected");
    }

    let state = AppState::new(
        pool,
        clock,
        config.strip_featured,
        config.auth.clone(),
        publishers,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("airlog listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
