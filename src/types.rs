//! Shared types for multiweather.
//!
//! Every provider normalises its reading to [`Kelvin`] before returning,
//! so the aggregator and the HTTP layer only ever see one unit.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// Offset between the Celsius and Kelvin scales.
pub const CELSIUS_OFFSET: f64 = 273.15;

/// An absolute temperature in Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kelvin(pub f64);

impl Kelvin {
    pub fn from_celsius(celsius: f64) -> Self {
        Kelvin(celsius + CELSIUS_OFFSET)
    }

    pub fn from_fahrenheit(fahrenheit: f64) -> Self {
        Kelvin((fahrenheit - 32.0) * 5.0 / 9.0 + CELSIUS_OFFSET)
    }

    pub fn to_celsius(self) -> f64 {
        self.0 - CELSIUS_OFFSET
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}K", self.0)
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A geographic coordinate pair as returned by a geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for multiweather.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Aggregator requires at least one provider")]
    NoProviders,

    #[error("No geocoding results for {0}")]
    NoGeocodingResults(String),

    #[error("Provider task ended without reporting ({reported} of {expected} outcomes received)")]
    TaskAborted { reported: usize, expected: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
