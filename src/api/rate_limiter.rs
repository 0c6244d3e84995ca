// src/api/rate_limiter.rs
//! Minimum spacing between outbound calls to one endpoint.

use crate::types::{RequestRate, ValidationError};
use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum interval of `1 / rate` between consecutive calls.
///
/// `wait` takes `&mut self`: one limiter serializes one caller. Share it
/// between tasks only behind a mutex that also covers the request itself.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(rate: RequestRate) -> Self {
        Self {
            min_interval: rate.min_interval(),
            last_call: None,
        }
    }

    /// Builds a limiter from a raw requests-per-second value.
    pub fn per_second(rate: f64) -> Result<Self, ValidationError> {
        Ok(Self::new(RequestRate::new(rate)?))
    }

    /// Sleeps until the interval since the previous call has passed, then
    /// records now as the new reference point. The first call never sleeps.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let delay = self.min_interval - elapsed;
                log::trace!("Rate limit: sleeping {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
