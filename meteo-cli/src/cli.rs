use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use meteo_core::{Config, ProviderId, WeatherGateway};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather and forecasts from Open-Meteo")]
pub struct Cli {
    /// Print records as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather".
        provider: String,
    },

    /// Show current conditions for a city or coordinates.
    Current(Place),

    /// Show hourly and daily forecast for a city or coordinates.
    Forecast {
        #[command(flatten)]
        place: Place,

        /// Number of hourly entries to print.
        #[arg(long, default_value_t = 24)]
        hours: usize,
    },

    /// Suggest city names matching a query.
    Suggest {
        query: String,
    },

    /// List the WMO weather codes with their descriptions and icons.
    Codes,
}

/// Either a city name or a latitude/longitude pair.
#[derive(Debug, Args)]
pub struct Place {
    /// City name to geocode.
    #[arg(required_unless_present_all = ["lat", "lon"], conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl Place {
    fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Codes => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&render::codes_json())?);
                } else {
                    print!("{}", render::codes_table());
                }
                Ok(())
            }
            Command::Current(place) => {
                let gateway = load_gateway()?;
                let weather = match (place.coordinates(), place.city.as_deref()) {
                    (Some((lat, lon)), _) => gateway.fetch_current_by_coordinates(lat, lon).await?,
                    (None, Some(city)) => gateway.fetch_current_by_city_name(city).await?,
                    (None, None) => bail!("Provide a city name or both --lat and --lon"),
                };

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&weather)?);
                } else {
                    print!("{}", render::current(&weather));
                }
                Ok(())
            }
            Command::Forecast { place, hours } => {
                let gateway = load_gateway()?;
                let forecast = match (place.coordinates(), place.city.as_deref()) {
                    (Some((lat, lon)), _) => {
                        gateway.fetch_forecast_by_coordinates(lat, lon).await?
                    }
                    (None, Some(city)) => gateway.fetch_forecast_by_city_name(city).await?,
                    (None, None) => bail!("Provide a city name or both --lat and --lon"),
                };

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&forecast)?);
                } else {
                    print!("{}", render::forecast(&forecast, hours));
                }
                Ok(())
            }
            Command::Suggest { query } => {
                let gateway = load_gateway()?;
                let cities = gateway.suggest_cities(&query).await;

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&cities)?);
                } else if cities.is_empty() {
                    println!("No suggestions for \"{query}\".");
                } else {
                    print!("{}", render::suggestions(&cities));
                }
                Ok(())
            }
        }
    }
}

fn load_gateway() -> anyhow::Result<WeatherGateway> {
    let config = Config::load()?;
    tracing::debug!(endpoints = ?config.endpoints, "loaded configuration");
    WeatherGateway::from_config(&config).context("Failed to build HTTP client")
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    if !id.requires_api_key() {
        println!("Provider '{id}' needs no credentials.");
        return Ok(());
    }

    let mut config = Config::load()?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    let path = config.save()?;
    println!("Saved {id} credentials to {}", path.display());
    Ok(())
}
