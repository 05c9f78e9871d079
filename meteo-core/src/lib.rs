//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather gateway over Open-Meteo and OpenWeather geocoding
//! - Display-ready domain models and the WMO weather code table
//!
//! It is used by `meteo-cli`, but can also back other front-ends.

pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod provider;
pub mod weather_code;

pub use config::{Config, Endpoints, ProviderConfig};
pub use error::GatewayError;
pub use gateway::WeatherGateway;
pub use model::{CityMatch, CurrentWeather, Forecast, ForecastPoint, Location};
pub use provider::{CitySearch, ProviderId, WeatherProvider};
pub use weather_code::{WmoCode, describe_code, icon_for};
