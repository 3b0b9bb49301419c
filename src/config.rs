//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

use crate::types::WeatherError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

/// Outbound HTTP settings shared by every provider's client.
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs() }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openweathermap: Option<SourceConfig>,
    #[serde(default)]
    pub weather_underground: Option<WeatherUndergroundConfig>,
    #[serde(default)]
    pub forecastio: Option<SourceConfig>,
}

/// Settings common to every remote weather source.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub enabled: bool,
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Overrides the public endpoint (local mirrors, tests).
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherUndergroundConfig {
    #[serde(flatten)]
    pub source: SourceConfig,
    /// Country segment of the lookup path.
    #[serde(default = "default_country")]
    pub country: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeocodingConfig {
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_country() -> String {
    "uk".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every outbound request fail.
    fn validate(&self) -> Result<(), WeatherError> {
        if self.http.timeout_secs == 0 {
            return Err(WeatherError::Config(
                "http.timeout_secs must be greater than zero".into(),
            ));
        }
        if let Some(wu) = &self.providers.weather_underground {
            if wu.source.enabled && wu.country.trim().is_empty() {
                return Err(WeatherError::Config(
                    "providers.weather_underground.country must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// Resolve an optional env-var reference to a secret, if both are present.
    pub fn resolve_secret(env_name: Option<&str>) -> Option<SecretString> {
        env_name
            .and_then(|env| Self::resolve_env(env).ok())
            .filter(|value| !value.is_empty())
            .map(SecretString::new)
    }
}
