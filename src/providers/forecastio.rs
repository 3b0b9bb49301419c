//! Forecast.io (Dark Sky) provider.
//!
//! Queries by coordinates, so the city is geocoded first. A geocoding
//! failure surfaces as this provider's failure.
//!
//! API: `https://api.forecast.io/forecast/{key}/{lat},{lon}`
//! Auth: API key in the path (required).
//! Unit: Fahrenheit (`currently.temperature`), converted to Kelvin.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{http_client, TemperatureProvider};
use crate::geocoding::Geocoder;
use crate::types::{Kelvin, Location};

const BASE_URL: &str = "https://api.forecast.io";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    currently: Currently,
}

#[derive(Debug, Deserialize)]
struct Currently {
    temperature: f64,
}

pub struct ForecastIo {
    http: Client,
    base_url: String,
    api_key: SecretString,
    geocoder: Arc<dyn Geocoder>,
}

impl ForecastIo {
    pub fn new(api_key: SecretString, geocoder: Arc<dyn Geocoder>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout).context("Failed to build Forecast.io HTTP client")?,
            base_url: BASE_URL.to_string(),
            api_key,
            geocoder,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, location: &Location) -> String {
        format!(
            "{}/forecast/{}/{location}",
            self.base_url,
            urlencoding::encode(self.api_key.expose_secret()),
        )
    }
}

#[async_trait]
impl TemperatureProvider for ForecastIo {
    async fn temperature(&self, city: &str) -> Result<Kelvin> {
        let location = self.geocoder.locate(city).await?;

        let resp = self
            .http
            .get(self.url(&location))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Forecast.io request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Forecast.io API error: {status}");
        }

        let data: ForecastResponse = resp
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse Forecast.io response")?;

        let kelvin = Kelvin::from_fahrenheit(data.currently.temperature);
        info!(provider = "forecastio", city, %location, %kelvin, "Temperature fetched");
        Ok(kelvin)
    }
}
