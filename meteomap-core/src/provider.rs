use crate::{
    config::RetryPolicy,
    model::{Coordinate, Forecast},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Error produced by a forecast fetch.
///
/// Variants keep their source for logging, but callers are expected to
/// treat every failure the same way: log it once and keep the previous
/// forecast.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to forecast endpoint failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("forecast endpoint returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed forecast payload: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Fetch current conditions plus the hourly series for one coordinate.
    async fn forecast(&self, coordinate: Coordinate) -> Result<Forecast, FetchError>;
}

/// Run a fetch under a bounded-retry policy with exponential backoff.
///
/// The default [`RetryPolicy`] makes a single attempt, so retrying only
/// happens when configuration asks for it.
pub async fn fetch_with_retry(
    provider: &dyn ForecastProvider,
    coordinate: Coordinate,
    policy: &RetryPolicy,
) -> Result<Forecast, FetchError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match provider.forecast(coordinate).await {
            Ok(forecast) => return Ok(forecast),
            Err(err) if attempt < attempts => {
                let delay = policy.backoff_after(attempt);
                log::debug!(
                    "fetch for {coordinate} failed on attempt {attempt}/{attempts}, \
                     retrying in {delay:?}: {err}"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
