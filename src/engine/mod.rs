//! Core engine — concurrent fan-out/fan-in over temperature providers.

pub mod aggregator;

pub use aggregator::Aggregator;
