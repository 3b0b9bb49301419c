//! Temperature providers.
//!
//! Defines the `TemperatureProvider` trait and the concrete remote
//! sources behind it. Each source normalises its native unit to Kelvin
//! before returning.

pub mod forecastio;
pub mod openweathermap;
pub mod weather_underground;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{AppConfig, SourceConfig};
use crate::geocoding::Geocoder;
use crate::types::Kelvin;

use forecastio::ForecastIo;
use openweathermap::OpenWeatherMap;
use weather_underground::WeatherUnderground;

const USER_AGENT: &str = "multiweather/0.1.0";

/// Abstraction over temperature sources.
///
/// Implementors perform their own I/O and decoding. Any failure is
/// terminal for the call; callers don't distinguish causes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemperatureProvider: Send + Sync {
    /// Current temperature for `city`, in Kelvin.
    async fn temperature(&self, city: &str) -> Result<Kelvin>;
}

/// Build the HTTP client every remote source uses.
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Instantiate the enabled providers from config, in a fixed order:
/// OpenWeatherMap, Weather Underground, Forecast.io.
///
/// Sources that need an API key are skipped with a warning when the
/// key cannot be resolved.
pub fn build_providers(
    cfg: &AppConfig,
    geocoder: Arc<dyn Geocoder>,
) -> Result<Vec<Arc<dyn TemperatureProvider>>> {
    let timeout = cfg.http.timeout();
    let mut providers: Vec<Arc<dyn TemperatureProvider>> = Vec::new();

    if let Some(src) = enabled(cfg.providers.openweathermap.as_ref()) {
        let key = AppConfig::resolve_secret(src.api_key_env.as_deref());
        let mut owm = OpenWeatherMap::new(key, timeout)?;
        if let Some(url) = &src.base_url {
            owm = owm.with_base_url(url);
        }
        info!(provider = "openweathermap", "Provider enabled");
        providers.push(Arc::new(owm));
    }

    if let Some(wu_cfg) = cfg.providers.weather_underground.as_ref() {
        if let Some(src) = enabled(Some(&wu_cfg.source)) {
            match AppConfig::resolve_secret(src.api_key_env.as_deref()) {
                Some(key) => {
                    let mut wu = WeatherUnderground::new(key, wu_cfg.country.clone(), timeout)?;
                    if let Some(url) = &src.base_url {
                        wu = wu.with_base_url(url);
                    }
                    info!(provider = "weather_underground", country = %wu_cfg.country, "Provider enabled");
                    providers.push(Arc::new(wu));
                }
                None => warn!(
                    provider = "weather_underground",
                    env = ?src.api_key_env,
                    "No API key configured, skipping provider"
                ),
            }
        }
    }

    if let Some(src) = enabled(cfg.providers.forecastio.as_ref()) {
        match AppConfig::resolve_secret(src.api_key_env.as_deref()) {
            Some(key) => {
                let mut fio = ForecastIo::new(key, Arc::clone(&geocoder), timeout)?;
                if let Some(url) = &src.base_url {
                    fio = fio.with_base_url(url);
                }
                info!(provider = "forecastio", "Provider enabled");
                providers.push(Arc::new(fio));
            }
            None => warn!(
                provider = "forecastio",
                env = ?src.api_key_env,
                "No API key configured, skipping provider"
            ),
        }
    }

    Ok(providers)
}

fn enabled(src: Option<&SourceConfig>) -> Option<&SourceConfig> {
    src.filter(|s| s.enabled)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
