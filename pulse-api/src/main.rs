//! pulse-api - Customer feedback service
//!
//! Accepts review submissions, enriches them with a schema-constrained
//! Gemini analysis, persists the result, and aggregates recent reviews
//! into a narrative report on demand.

use anyhow::Result;
use clap::Parser;
use pulse_api::services::gemini::GeminiClient;
use pulse_api::services::rate_limiter::SlidingWindowLimiter;
use pulse_api::{build_router, AppState};
use pulse_common::config;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Interval between rate-limiter eviction sweeps
const SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Parser)]
#[command(name = "pulse-api", about = "ReviewPulse customer feedback service")]
struct Cli {
    /// Data directory holding the SQLite database
    #[arg(long)]
    data_dir: Option<String>,

    /// Listen port
    #[arg(long)]
    port: Option<u16>,
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

    info!(
        "Starting ReviewPulse feedback service (pulse-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();
    let toml_config = config::load_toml_config();

    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref(), &toml_config);
    config::ensure_data_dir(&data_dir)?;

    let port = config::resolve_port(cli.port, &toml_config);
    let api_key = config::resolve_gemini_api_key(&toml_config)?;

    let db_path = config::database_path(&data_dir);
    info!("Database: {}", db_path.display());

    let db_pool = pulse_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Gemini client and rate limiter are built once here and shared
    // through AppState; nothing is lazily initialized on first use.
    let analyzer: Arc<dyn pulse_api::services::gemini::ReviewAnalyzer> =
        Arc::new(GeminiClient::new(api_key)?);
    let limiter = Arc::new(SlidingWindowLimiter::new());

    // Without periodic eviction the window map grows for every client id
    // ever seen.
    let sweeper = limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let now_ms = chrono::Utc::now().timestamp_millis();
            let removed = sweeper.sweep(now_ms).await;
            if removed > 0 {
                debug!(removed, "Evicted idle rate-limit windows");
            }
        }
    });

    let state = AppState::new(db_pool, analyzer, limiter);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
