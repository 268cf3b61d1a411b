//! Core library for the `meteomap` forecast viewer.
//!
//! This crate defines:
//! - The domain model (coordinates, current snapshot, hourly series)
//! - The forecast provider abstraction and the Open-Meteo implementation
//! - The latest-wins fetch session that keeps responses ordered
//! - Configuration (startup coordinate, retry policy)
//!
//! It is used by `meteomap-tui`, but can also be reused by other binaries
//! or services.

pub mod config;
pub mod model;
pub mod provider;
pub mod session;

pub use config::{Config, LocationConfig, RetryPolicy};
pub use model::{Coordinate, CurrentSnapshot, DISPLAY_HOURS, Forecast, HourlyPoint};
pub use provider::{FetchError, ForecastProvider, fetch_with_retry, open_meteo::OpenMeteoProvider};
pub use session::{ForecastSession, RequestToken};
