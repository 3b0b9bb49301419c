//! HTTP route handlers.
//!
//! Success bodies are JSON; failures are a 500 with the error message
//! as plain text. State is shared via `Arc<ServiceState>`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::geocoding::Geocoder;
use crate::providers::TemperatureProvider;
use crate::types::Kelvin;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServiceState {
    /// Usually an `Aggregator`; any provider works.
    pub weather: Arc<dyn TemperatureProvider>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl ServiceState {
    pub fn new(weather: Arc<dyn TemperatureProvider>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { weather, geocoder }
    }
}

pub type AppState = Arc<ServiceState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct WeatherResponse {
    pub city: String,
    /// Kelvin.
    pub temp: Kelvin,
    pub took: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationResponse {
    pub city: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Any lookup failure, rendered as a 500 with the error chain as text.
///
/// Providers strip request URLs from transport errors, so the chain never
/// carries API keys.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}\n", self.0)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /weather/:city
pub async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let begin = Instant::now();

    let temp = state.weather.temperature(&city).await.map_err(|e| {
        error!(city = %city, error = %e, "Temperature lookup failed");
        e
    })?;

    let took = format!("{:?}", begin.elapsed());
    info!(city = %city, %temp, took = %took, "Temperature served");

    Ok(Json(WeatherResponse { city, temp, took }))
}

/// GET /location/:city
pub async fn get_location(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<LocationResponse>, ApiError> {
    let location = state.geocoder.locate(&city).await.map_err(|e| {
        error!(city = %city, error = %e, "Location lookup failed");
        e
    })?;

    Ok(Json(LocationResponse {
        city,
        longitude: location.longitude,
        latitude: location.latitude,
    }))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
