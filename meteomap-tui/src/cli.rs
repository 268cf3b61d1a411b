use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, validator::Validation};
use meteomap_core::{Config, Coordinate, OpenMeteoProvider, fetch_with_retry};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteomap", version, about = "Pick a point on the map, get the forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive map with live readout and hourly chart (the default).
    Watch {
        /// Startup latitude, overriding the configured default.
        #[arg(long)]
        latitude: Option<f64>,

        /// Startup longitude, overriding the configured default.
        #[arg(long)]
        longitude: Option<f64>,
    },

    /// Print one forecast readout and exit.
    Show {
        /// Latitude in decimal degrees.
        latitude: f64,

        /// Longitude in decimal degrees.
        longitude: f64,
    },

    /// Set the default startup coordinate.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Watch { latitude: None, longitude: None }) {
            Command::Watch { latitude, longitude } => {
                let fallback = config.location.coordinate();
                let start = Coordinate::new(
                    latitude.unwrap_or(fallback.latitude),
                    longitude.unwrap_or(fallback.longitude),
                );
                crate::app::run(config, start).await
            }
            Command::Show { latitude, longitude } => {
                show(&config, Coordinate::new(latitude, longitude)).await
            }
            Command::Configure => configure(config),
        }
    }
}

async fn show(config: &Config, coordinate: Coordinate) -> anyhow::Result<()> {
    let provider = OpenMeteoProvider::new();
    let forecast = fetch_with_retry(&provider, coordinate, &config.retry)
        .await
        .with_context(|| format!("Failed to fetch forecast for {coordinate}"))?;

    println!("Forecast for {coordinate}");
    println!("  temperature: {:>6.1} °C", forecast.current.temperature);
    println!("  wind speed:  {:>6.1} km/h", forecast.current.wind_speed);
    println!();

    let window = forecast.display_window();
    println!("Next {} hours:", window.len());
    println!("  {:<6} {:>8} {:>11} {:>10}", "time", "temp °C", "humidity %", "wind km/h");
    for point in window {
        println!(
            "  {:<6} {:>8.1} {:>11.0} {:>10.1}",
            point.time, point.temperature, point.humidity, point.wind
        );
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current = config.location.coordinate();

    let latitude = CustomType::<f64>::new("Default latitude:")
        .with_default(current.latitude)
        .with_help_message("Decimal degrees, -90 to 90")
        .with_validator(|v: &f64| {
            if (-90.0..=90.0).contains(v) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Latitude must be between -90 and 90.".into()))
            }
        })
        .prompt()?;

    let longitude = CustomType::<f64>::new("Default longitude:")
        .with_default(current.longitude)
        .with_help_message("Decimal degrees, -180 to 180")
        .with_validator(|v: &f64| {
            if (-180.0..=180.0).contains(v) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Longitude must be between -180 and 180.".into()))
            }
        })
        .prompt()?;

    config.set_default_coordinate(Coordinate::new(latitude, longitude));
    config.save()?;

    println!(
        "Saved default coordinate {} to {}",
        config.location.coordinate(),
        Config::config_file_path()?.display()
    );

    Ok(())
}
