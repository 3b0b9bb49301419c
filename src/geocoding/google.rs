//! Google Maps geocoding integration.
//!
//! API: `https://maps.googleapis.com/maps/api/geocode/json?address={city}`
//! Auth: `key` query parameter (optional for low-volume use).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::Geocoder;
use crate::providers::http_client;
use crate::types::{Location, WeatherError};

const BASE_URL: &str = "https://maps.googleapis.com";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GoogleGeocoder {
    http: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl GoogleGeocoder {
    pub fn new(api_key: Option<SecretString>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout).context("Failed to build geocoding HTTP client")?,
            base_url: BASE_URL.to_string(),
            api_key,
        })
    }

    /// Point the client at a different host (mirrors, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, city: &str) -> String {
        let mut url = format!(
            "{}/maps/api/geocode/json?address={}",
            self.base_url,
            urlencoding::encode(city)
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key.expose_secret()));
        }
        url
    }

    /// Take the first (best) match.
    fn first_location(city: &str, resp: GeocodeResponse) -> Result<Location> {
        let best = resp
            .results
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NoGeocodingResults(city.to_string()))?;
        Ok(Location {
            latitude: best.geometry.location.lat,
            longitude: best.geometry.location.lng,
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn locate(&self, city: &str) -> Result<Location> {
        let resp = self
            .http
            .get(self.url(city))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Geocoding request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Geocoding API error: {status}");
        }

        let data: GeocodeResponse = resp
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse geocoding response")?;

        let location = Self::first_location(city, data)?;
        debug!(city, %location, "Geocoded");
        Ok(location)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
