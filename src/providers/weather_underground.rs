//! Weather Underground current-conditions provider.
//!
//! API: `http://api.wunderground.com/api/{key}/conditions/q/{country}/{city}.json`
//! Auth: API key in the path (required).
//! Unit: Celsius (`temp_c`), converted to Kelvin.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::{http_client, TemperatureProvider};
use crate::types::Kelvin;

const BASE_URL: &str = "http://api.wunderground.com";

#[derive(Debug, Deserialize)]
struct WuResponse {
    current_observation: WuObservation,
}

#[derive(Debug, Deserialize)]
struct WuObservation {
    temp_c: f64,
}

pub struct WeatherUnderground {
    http: Client,
    base_url: String,
    api_key: SecretString,
    country: String,
}

impl WeatherUnderground {
    pub fn new(api_key: SecretString, country: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)
                .context("Failed to build Weather Underground HTTP client")?,
            base_url: BASE_URL.to_string(),
            api_key,
            country,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, city: &str) -> String {
        format!(
            "{}/api/{}/conditions/q/{}/{}.json",
            self.base_url,
            urlencoding::encode(self.api_key.expose_secret()),
            urlencoding::encode(&self.country),
            urlencoding::encode(city),
        )
    }
}

#[async_trait]
impl TemperatureProvider for WeatherUnderground {
    async fn temperature(&self, city: &str) -> Result<Kelvin> {
        let resp = self
            .http
            .get(self.url(city))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Weather Underground request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Weather Underground API error: {status}");
        }

        let data: WuResponse = resp
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse Weather Underground response")?;

        let kelvin = Kelvin::from_celsius(data.current_observation.temp_c);
        info!(provider = "weather_underground", city, %kelvin, "Temperature fetched");
        Ok(kelvin)
    }
}
