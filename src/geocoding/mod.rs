//! City name → coordinates lookup.
//!
//! Defines the `Geocoder` trait consumed by providers that query by
//! coordinates rather than by name, and by the `/location` route.

pub mod google;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Location;

/// Abstraction over geocoding services.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a city name to its coordinates.
    async fn locate(&self, city: &str) -> Result<Location>;
}
