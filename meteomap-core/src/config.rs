use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Coordinate;

/// Coordinate the viewer opens on before the user selects anything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationConfig {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Berlin, matching the endpoint's own documentation examples.
        Self { latitude: 52.52, longitude: 13.41 }
    }
}

/// Bounded-retry policy for forecast fetches.
///
/// `max_attempts = 1` means a single attempt and no retry, which is the
/// default; resilience is opt-in through the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based), doubling
    /// each time.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(1 << exp))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 1, initial_backoff_ms: 500 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [location]
/// latitude = 52.52
/// longitude = 13.41
///
/// [retry]
/// max_attempts = 3
/// initial_backoff_ms = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteomap", "meteomap")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the startup coordinate.
    pub fn set_default_coordinate(&mut self, coordinate: Coordinate) {
        self.location = LocationConfig {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_berlin_with_a_single_attempt() {
        let cfg = Config::default();

        assert_eq!(cfg.location.coordinate(), Coordinate::new(52.52, 13.41));
        assert_eq!(cfg.retry.max_attempts, 1);
    }

    #[test]
    fn set_default_coordinate_replaces_the_location() {
        let mut cfg = Config::default();
        cfg.set_default_coordinate(Coordinate::new(48.85661234, 2.35221234));

        assert_eq!(cfg.location.coordinate(), Coordinate::new(48.8566, 2.3522));
    }

    #[test]
    fn partial_toml_fills_missing_sections_with_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [location]
            latitude = -33.8688
            longitude = 151.2093
            "#,
        )
        .expect("partial config must parse");

        assert_eq!(cfg.location.coordinate(), Coordinate::new(-33.8688, 151.2093));
        assert_eq!(cfg.retry.max_attempts, 1);
        assert_eq!(cfg.retry.initial_backoff_ms, 500);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_default_coordinate(Coordinate::new(35.6895, 139.6917));
        cfg.retry = RetryPolicy { max_attempts: 3, initial_backoff_ms: 250 };

        let serialized = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&serialized).expect("reparse");

        assert_eq!(parsed.location.coordinate(), Coordinate::new(35.6895, 139.6917));
        assert_eq!(parsed.retry.max_attempts, 3);
        assert_eq!(parsed.retry.initial_backoff_ms, 250);
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy { max_attempts: 4, initial_backoff_ms: 100 };

        assert_eq!(policy.backoff_after(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_after(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_after(3), Duration::from_millis(400));
    }
}
