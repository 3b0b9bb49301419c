//! Concurrent multi-provider temperature aggregation.
//!
//! The `Aggregator` fans a single request out to every held provider on
//! its own task and reduces the outcomes to their arithmetic mean. It is
//! itself a `TemperatureProvider`, so callers never know how many sources
//! sit behind it.
//!
//! Failure policy is all-or-nothing: the first error observed is returned
//! as-is and no partial average is ever produced. Tasks still in flight at
//! that point are not cancelled; they finish on their own and their
//! outcomes are dropped.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::providers::TemperatureProvider;
use crate::types::{Kelvin, WeatherError};

/// Composite provider averaging a fixed, ordered set of providers.
pub struct Aggregator {
    providers: Vec<Arc<dyn TemperatureProvider>>,
}

impl Aggregator {
    /// Build an aggregator over `providers`. The set is fixed for the
    /// aggregator's lifetime and must not be empty.
    pub fn new(providers: Vec<Arc<dyn TemperatureProvider>>) -> Result<Self, WeatherError> {
        if providers.is_empty() {
            return Err(WeatherError::NoProviders);
        }
        Ok(Self { providers })
    }

    /// Number of providers queried per request.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl TemperatureProvider for Aggregator {
    async fn temperature(&self, city: &str) -> Result<Kelvin> {
        let expected = self.providers.len();

        // One slot per provider: no task ever waits on the reader to publish.
        let (tx, mut rx) = mpsc::channel::<Result<Kelvin>>(expected);

        for (index, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let tx = tx.clone();
            let city = city.to_owned();
            tokio::spawn(async move {
                let outcome = provider.temperature(&city).await;
                // Fails only if the reader already returned on an earlier error.
                if tx.send(outcome).await.is_err() {
                    debug!(provider = index, "Outcome dropped after early return");
                }
            });
        }
        // Only task-held senders remain, so `recv` yields `None` if a task
        // dies without publishing.
        drop(tx);

        let mut sum = 0.0;
        for reported in 0..expected {
            match rx.recv().await {
                Some(Ok(kelvin)) => sum += kelvin.value(),
                Some(Err(e)) => {
                    warn!(city, reported, expected, error = %e, "Provider failed, aborting aggregate");
                    return Err(e);
                }
                None => return Err(WeatherError::TaskAborted { reported, expected }.into()),
            }
        }

        let mean = Kelvin(sum / expected as f64);
        debug!(city, providers = expected, %mean, "Aggregate computed");
        Ok(mean)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
