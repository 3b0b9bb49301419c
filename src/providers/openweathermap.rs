//! OpenWeatherMap current-conditions provider.
//!
//! API: `http://api.openweathermap.org/data/2.5/weather?q={city}`
//! Auth: optional `appid` query parameter.
//! Unit: Kelvin (the API default), so no conversion is needed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::{http_client, TemperatureProvider};
use crate::types::Kelvin;

const BASE_URL: &str = "http://api.openweathermap.org";

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

pub struct OpenWeatherMap {
    http: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl OpenWeatherMap {
    pub fn new(api_key: Option<SecretString>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout).context("Failed to build OpenWeatherMap HTTP client")?,
            base_url: BASE_URL.to_string(),
            api_key,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, city: &str) -> String {
        let mut url = format!("{}/data/2.5/weather?q={}", self.base_url, urlencoding::encode(city));
        if let Some(key) = &self.api_key {
            url.push_str("&appid=");
            url.push_str(&urlencoding::encode(key.expose_secret()));
        }
        url
    }
}

#[async_trait]
impl TemperatureProvider for OpenWeatherMap {
    async fn temperature(&self, city: &str) -> Result<Kelvin> {
        let resp = self
            .http
            .get(self.url(city))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("OpenWeatherMap request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("OpenWeatherMap API error: {status}");
        }

        let data: OwmResponse = resp
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse OpenWeatherMap response")?;

        let kelvin = Kelvin(data.main.temp);
        info!(provider = "openweathermap", city, %kelvin, "Temperature fetched");
        Ok(kelvin)
    }
}
