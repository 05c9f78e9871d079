use crate::{
    CityMatch, Config, CurrentWeather, Forecast,
    error::Result,
    provider::{CitySearch, WeatherProvider, city_search_from_config, weather_provider_from_config},
    weather_code,
};

/// Entry point for front-ends: current weather, forecasts and city suggestions.
///
/// Holds no state between calls. Weather operations propagate every failure;
/// [`WeatherGateway::suggest_cities`] never fails and returns an empty list instead.
#[derive(Debug)]
pub struct WeatherGateway {
    weather: Box<dyn WeatherProvider>,
    cities: Box<dyn CitySearch>,
}

impl WeatherGateway {
    pub fn new(weather: Box<dyn WeatherProvider>, cities: Box<dyn CitySearch>) -> Self {
        Self { weather, cities }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            weather_provider_from_config(config)?,
            city_search_from_config(config)?,
        ))
    }

    pub async fn fetch_current_by_city_name(&self, city: &str) -> Result<CurrentWeather> {
        self.weather.current_by_city_name(city).await
    }

    pub async fn fetch_forecast_by_city_name(&self, city: &str) -> Result<Forecast> {
        self.weather.forecast_by_city_name(city).await
    }

    pub async fn fetch_current_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeather> {
        self.weather
            .current_by_coordinates(latitude, longitude)
            .await
    }

    pub async fn fetch_forecast_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Forecast> {
        self.weather
            .forecast_by_coordinates(latitude, longitude)
            .await
    }

    pub async fn suggest_cities(&self, query: &str) -> Vec<CityMatch> {
        self.cities.suggest_cities(query).await
    }

    pub fn describe_code(code: i32) -> &'static str {
        weather_code::describe_code(code)
    }

    pub fn icon_for(code: i32) -> &'static str {
        weather_code::icon_for(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GatewayError, model::Conditions, weather_code::WmoCode};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct StubWeather;

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn current_by_city_name(&self, city: &str) -> Result<CurrentWeather> {
            Err(GatewayError::NotFound {
                query: city.to_string(),
            })
        }

        async fn forecast_by_city_name(&self, _city: &str) -> Result<Forecast> {
            Err(GatewayError::MalformedResponse("broken".into()))
        }

        async fn current_by_coordinates(&self, lat: f64, lon: f64) -> Result<CurrentWeather> {
            Ok(CurrentWeather::new(
                format!("{lat},{lon}"),
                String::new(),
                Conditions {
                    temperature: 0.0,
                    feels_like: 0.0,
                    humidity: 0.0,
                    wind_speed: 0.0,
                    code: WmoCode(0),
                },
            ))
        }

        async fn forecast_by_coordinates(&self, _lat: f64, _lon: f64) -> Result<Forecast> {
            Ok(Forecast::default())
        }
    }

    #[derive(Debug)]
    struct NoCities;

    #[async_trait]
    impl CitySearch for NoCities {
        async fn suggest_cities(&self, _query: &str) -> Vec<CityMatch> {
            Vec::new()
        }
    }

    fn gateway() -> WeatherGateway {
        WeatherGateway::new(Box::new(StubWeather), Box::new(NoCities))
    }

    #[tokio::test]
    async fn weather_errors_reach_the_caller() {
        let gw = gateway();
        let err = gw.fetch_current_by_city_name("Nowhereville").await.unwrap_err();
        assert!(err.is_not_found());

        let err = gw.fetch_forecast_by_city_name("x").await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn coordinates_are_forwarded() {
        let gw = gateway();
        let weather = gw.fetch_current_by_coordinates(1.5, -2.5).await.unwrap();
        assert_eq!(weather.location_name, "1.5,-2.5");
        assert_eq!(weather.description, "Clear sky");
        assert!(gw.fetch_forecast_by_coordinates(0.0, 0.0).await.unwrap().hourly.is_empty());
    }

    #[test]
    fn code_lookups_delegate_to_table() {
        assert_eq!(WeatherGateway::describe_code(95), "Thunderstorm");
        assert_eq!(WeatherGateway::icon_for(0), "mdi-weather-sunny");
        assert_eq!(WeatherGateway::describe_code(7), "Unknown");
        assert_eq!(WeatherGateway::icon_for(7), "mdi-weather-cloudy");
    }

    #[test]
    fn gateway_builds_from_default_config() {
        assert!(WeatherGateway::from_config(&Config::default()).is_ok());
    }
}
