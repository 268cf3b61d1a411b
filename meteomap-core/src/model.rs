use serde::{Deserialize, Serialize};

/// How many hourly entries the presentation layer shows, regardless of how
/// many the provider returns.
pub const DISPLAY_HOURS: usize = 24;

/// A geographic point picked by the user.
///
/// Construct through [`Coordinate::new`], which rounds both axes to four
/// decimal places. Replaced wholesale on every new selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round4(latitude),
            longitude: round4(longitude),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Instantaneous conditions at the selected coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub temperature: f64,
    pub wind_speed: f64,
}

/// One hour of forecast values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Clock label, `HH:MM`.
    pub time: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
}

/// A complete fetch result. Snapshot and hourly series always travel
/// together so downstream state can replace both atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub current: CurrentSnapshot,
    pub hourly: Vec<HourlyPoint>,
}

impl Forecast {
    /// The slice the presentation layer plots: at most [`DISPLAY_HOURS`]
    /// entries from the start of the series.
    pub fn display_window(&self) -> &[HourlyPoint] {
        &self.hourly[..self.hourly.len().min(DISPLAY_HOURS)]
    }
}
