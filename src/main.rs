//! multiweather — concurrent multi-source temperature aggregation.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the provider set behind a single aggregator, and serves the
//! HTTP API until Ctrl+C.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use multiweather::config::{self, AppConfig};
use multiweather::engine::Aggregator;
use multiweather::geocoding::google::GoogleGeocoder;
use multiweather::geocoding::Geocoder;
use multiweather::providers;
use multiweather::server::{self, ServiceState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load("config.toml")?;

    init_logging();

    info!(
        port = cfg.server.port,
        timeout_secs = cfg.http.timeout_secs,
        "multiweather starting up"
    );

    // -- Initialise components -------------------------------------------

    let geo_key = AppConfig::resolve_secret(cfg.geocoding.api_key_env.as_deref());
    let mut google = GoogleGeocoder::new(geo_key, cfg.http.timeout())?;
    if let Some(url) = &cfg.geocoding.base_url {
        google = google.with_base_url(url);
    }
    let geocoder: Arc<dyn Geocoder> = Arc::new(google);

    let sources = providers::build_providers(&cfg, Arc::clone(&geocoder))?;
    let aggregator = Aggregator::new(sources).context("No weather providers enabled")?;
    info!(providers = aggregator.len(), "Aggregator ready");

    let state = Arc::new(ServiceState::new(Arc::new(aggregator), geocoder));

    server::serve(state, cfg.server.port).await
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("multiweather=info"));

    let json_logging = std::env::var("MULTIWEATHER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
