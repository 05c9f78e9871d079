use crate::{
    Config, CityMatch, CurrentWeather, Forecast,
    error::Result,
    provider::{open_meteo::OpenMeteoProvider, openweather::OpenWeatherGeocoder},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod open_meteo;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenMeteo,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "openmeteo",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenMeteo, ProviderId::OpenWeather]
    }

    /// Whether requests to this provider need an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openmeteo" | "open-meteo" => Ok(ProviderId::OpenMeteo),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openmeteo, openweather."
            )),
        }
    }
}

/// Source of weather data. Every failure is returned to the caller.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_by_city_name(&self, city: &str) -> Result<CurrentWeather>;

    async fn forecast_by_city_name(&self, city: &str) -> Result<Forecast>;

    async fn current_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeather>;

    async fn forecast_by_coordinates(&self, latitude: f64, longitude: f64) -> Result<Forecast>;
}

/// Best-effort city lookup. Implementations never fail; they return an empty list instead.
#[async_trait]
pub trait CitySearch: Send + Sync + Debug {
    async fn suggest_cities(&self, query: &str) -> Vec<CityMatch>;
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("meteo/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Construct the weather provider from config.
pub fn weather_provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>> {
    let http = http_client(config.request_timeout())?;
    Ok(Box::new(OpenMeteoProvider::with_client(
        http,
        &config.endpoints.geocoding_url,
        &config.endpoints.forecast_url,
    )))
}

/// Construct the city search provider from config.
///
/// A missing API key is not an error here; the provider answers with no suggestions.
pub fn city_search_from_config(config: &Config) -> Result<Box<dyn CitySearch>> {
    let api_key = config.provider_api_key(ProviderId::OpenWeather);
    if api_key.is_none() {
        tracing::debug!(
            "No API key configured for provider '{}'; city suggestions are disabled. \
             Hint: run `meteo configure {}`.",
            ProviderId::OpenWeather,
            ProviderId::OpenWeather
        );
    }

    let http = http_client(config.request_timeout())?;
    Ok(Box::new(OpenWeatherGeocoder::with_client(
        http,
        &config.endpoints.suggest_url,
        api_key.map(str::to_owned),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_accepts_hyphenated_alias() {
        assert_eq!(
            ProviderId::try_from("Open-Meteo").unwrap(),
            ProviderId::OpenMeteo
        );
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn only_openweather_needs_a_key() {
        assert!(ProviderId::OpenWeather.requires_api_key());
        assert!(!ProviderId::OpenMeteo.requires_api_key());
    }

    #[test]
    fn providers_build_from_default_config() {
        let cfg = Config::default();
        assert!(weather_provider_from_config(&cfg).is_ok());
        assert!(city_search_from_config(&cfg).is_ok());
    }
}
