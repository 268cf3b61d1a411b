use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Coordinate, CurrentSnapshot, Forecast, HourlyPoint};

use super::{FetchError, ForecastProvider};

/// Public Open-Meteo forecast endpoint. No API key required.
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const HOURLY_SERIES: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self::with_base_url(FORECAST_URL)
    }

    /// Point the provider at a different endpoint, e.g. a local test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current_weather: OmCurrentWeather,
    hourly: OmHourly,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    relative_humidity_2m: Vec<f64>,
    wind_speed_10m: Vec<f64>,
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn forecast(&self, coordinate: Coordinate) -> Result<Forecast, FetchError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", coordinate.latitude.to_string()),
                ("longitude", coordinate.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", HOURLY_SERIES.to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        into_forecast(parsed)
    }
}

fn into_forecast(response: OmResponse) -> Result<Forecast, FetchError> {
    let OmHourly {
        time,
        temperature_2m,
        relative_humidity_2m,
        wind_speed_10m,
    } = response.hourly;

    // Matching-index triples only: a ragged payload yields the shortest
    // common prefix instead of an error.
    let len = time
        .len()
        .min(temperature_2m.len())
        .min(relative_humidity_2m.len())
        .min(wind_speed_10m.len());

    let mut hourly = Vec::with_capacity(len);
    for i in 0..len {
        hourly.push(HourlyPoint {
            time: clock_label(&time[i])?,
            temperature: temperature_2m[i],
            humidity: relative_humidity_2m[i],
            wind: wind_speed_10m[i],
        });
    }

    Ok(Forecast {
        current: CurrentSnapshot {
            temperature: response.current_weather.temperature,
            wind_speed: response.current_weather.windspeed,
        },
        hourly,
    })
}

/// Reduce an ISO timestamp like `2024-07-15T05:00` to its `HH:MM` label.
fn clock_label(iso: &str) -> Result<String, FetchError> {
    let parsed = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M")
        .map_err(|_| FetchError::Malformed(format!("unparseable hourly timestamp: {iso}")))?;

    Ok(parsed.format("%H:%M").to_string())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hourly_body(hours: usize) -> serde_json::Value {
        let time: Vec<String> = (0..hours)
            .map(|h| format!("2024-07-{:02}T{:02}:00", 15 + h / 24, h % 24))
            .collect();
        let temps: Vec<f64> = (0..hours).map(|h| 10.0 + h as f64 * 0.1).collect();
        let humidity: Vec<f64> = (0..hours).map(|h| 60.0 + h as f64).collect();
        let wind: Vec<f64> = (0..hours).map(|h| 5.0 + h as f64 * 0.2).collect();

        json!({
            "current_weather": { "temperature": 18.3, "windspeed": 11.2 },
            "hourly": {
                "time": time,
                "temperature_2m": temps,
                "relative_humidity_2m": humidity,
                "wind_speed_10m": wind,
            }
        })
    }

    #[tokio::test]
    async fn fetch_sends_rounded_coordinate_and_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("latitude", "48.8566"))
            .and(query_param("longitude", "2.3522"))
            .and(query_param("current_weather", "true"))
            .and(query_param("hourly", HOURLY_SERIES))
            .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body(48)))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::with_base_url(server.uri());
        let forecast = provider
            .forecast(Coordinate::new(48.85661234, 2.35221234))
            .await
            .expect("fetch should succeed");

        assert_eq!(forecast.current.temperature, 18.3);
        assert_eq!(forecast.current.wind_speed, 11.2);
        assert_eq!(forecast.hourly.len(), 48);
        assert_eq!(forecast.hourly[0].time, "00:00");
        assert_eq!(forecast.hourly[25].time, "01:00");
        assert_eq!(forecast.display_window().len(), 24);
    }

    #[tokio::test]
    async fn ragged_arrays_zip_to_shortest_length() {
        let server = MockServer::start().await;
        let mut body = hourly_body(24);
        body["hourly"]["relative_humidity_2m"] = json!([60.0, 61.0, 62.0]);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::with_base_url(server.uri());
        let forecast = provider
            .forecast(Coordinate::new(52.52, 13.41))
            .await
            .expect("fetch should succeed");

        assert_eq!(forecast.hourly.len(), 3);
        assert_eq!(forecast.hourly[2].humidity, 62.0);
    }

    #[tokio::test]
    async fn server_error_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::with_base_url(server.uri());
        let err = provider
            .forecast(Coordinate::new(52.52, 13.41))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { .. }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn undecodable_payload_maps_to_malformed_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::with_base_url(server.uri());
        let err = provider
            .forecast(Coordinate::new(52.52, 13.41))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn unparseable_hourly_timestamp_maps_to_malformed_error() {
        let server = MockServer::start().await;
        let mut body = hourly_body(2);
        body["hourly"]["time"] = json!(["2024-07-15T00:00", "yesterday-ish"]);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::with_base_url(server.uri());
        let err = provider
            .forecast(Coordinate::new(52.52, 13.41))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Malformed(_)));
        assert!(err.to_string().contains("yesterday-ish"));
    }
}
