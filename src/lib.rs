//! multiweather — concurrent multi-source temperature aggregation.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod providers;
pub mod geocoding;
pub mod engine;
pub mod server;
