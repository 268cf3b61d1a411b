use crate::model::{Coordinate, CurrentSnapshot, Forecast, HourlyPoint};

/// Identifies one outbound fetch. Tokens are issued in a strictly
/// increasing sequence, so comparing a completion's token against the
/// newest issued one is enough to order responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Owns the coordinate/snapshot/hourly triple and the latest-wins guard.
///
/// Requests are never cancelled once in flight; instead, a completion only
/// lands if no newer selection has been made since it was issued. Snapshot
/// and hourly series are replaced together, so the panel never mixes data
/// from two coordinates.
#[derive(Debug)]
pub struct ForecastSession {
    coordinate: Coordinate,
    snapshot: Option<CurrentSnapshot>,
    hourly: Vec<HourlyPoint>,
    last_issued: u64,
}

impl ForecastSession {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            snapshot: None,
            hourly: Vec::new(),
            last_issued: 0,
        }
    }

    /// The most recently selected coordinate.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Current conditions, absent until the first successful fetch.
    pub fn snapshot(&self) -> Option<&CurrentSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn hourly(&self) -> &[HourlyPoint] {
        &self.hourly
    }

    /// Record a new selection: the coordinate is replaced wholesale and a
    /// fresh token is issued for the fetch it triggers. Selecting the same
    /// coordinate again still issues a new token (an explicit refresh).
    pub fn select(&mut self, coordinate: Coordinate) -> RequestToken {
        self.coordinate = coordinate;
        self.last_issued += 1;
        RequestToken(self.last_issued)
    }

    /// Whether `token` belongs to the newest selection.
    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.last_issued
    }

    /// Install a completed fetch. Returns `false`, leaving state untouched,
    /// when a newer selection has been made since the request was issued.
    pub fn apply(&mut self, token: RequestToken, forecast: Forecast) -> bool {
        if !self.is_latest(token) {
            log::debug!("discarding superseded forecast response for token {token:?}");
            return false;
        }

        self.snapshot = Some(forecast.current);
        self.hourly = forecast.hourly;
        true
    }
}
