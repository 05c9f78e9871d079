use serde::{Deserialize, Serialize};

use crate::weather_code::WmoCode;

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country_code: String,
}

/// Current conditions for a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub location_name: String,
    pub country_code: String,
    pub description: String,
    pub icon_id: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// Raw current readings before a location name is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub code: WmoCode,
}

impl CurrentWeather {
    pub fn new(location_name: String, country_code: String, conditions: Conditions) -> Self {
        let (description, icon) = conditions.code.display();
        Self {
            location_name,
            country_code,
            description: description.to_owned(),
            icon_id: icon.to_owned(),
            temperature: conditions.temperature,
            feels_like: conditions.feels_like,
            humidity: conditions.humidity,
            wind_speed: conditions.wind_speed,
        }
    }
}

/// One entry of an hourly or daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub timestamp_seconds: i64,
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    pub description: String,
    pub icon_id: String,
}

impl ForecastPoint {
    pub fn hourly(
        timestamp_seconds: i64,
        temperature: f64,
        feels_like: f64,
        humidity: f64,
        code: WmoCode,
    ) -> Self {
        let (description, icon) = code.display();
        Self {
            timestamp_seconds,
            temperature,
            feels_like: Some(feels_like),
            humidity: Some(humidity),
            description: description.to_owned(),
            icon_id: icon.to_owned(),
        }
    }

    /// Daily points carry the midpoint of the day's range.
    pub fn daily(timestamp_seconds: i64, max: f64, min: f64, code: WmoCode) -> Self {
        let (description, icon) = code.display();
        Self {
            timestamp_seconds,
            temperature: (max + min) / 2.0,
            feels_like: None,
            humidity: None,
            description: description.to_owned(),
            icon_id: icon.to_owned(),
        }
    }
}

/// Hourly and daily series in chronological order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub hourly: Vec<ForecastPoint>,
    pub daily: Vec<ForecastPoint>,
}

/// A city suggestion from the secondary geocoding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMatch {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_weather_uses_camel_case_fields() {
        let weather = CurrentWeather::new(
            "Berlin".into(),
            "Germany".into(),
            Conditions {
                temperature: 12.5,
                feels_like: 10.0,
                humidity: 70.0,
                wind_speed: 4.2,
                code: WmoCode(3),
            },
        );

        let json = serde_json::to_value(&weather).unwrap();
        assert_eq!(json["locationName"], "Berlin");
        assert_eq!(json["countryCode"], "Germany");
        assert_eq!(json["description"], "Overcast");
        assert_eq!(json["iconId"], "mdi-weather-cloudy");
        assert_eq!(json["feelsLike"], 10.0);
        assert_eq!(json["windSpeed"], 4.2);
    }

    #[test]
    fn daily_point_omits_hourly_only_fields() {
        let point = ForecastPoint::daily(1_700_000_000, 20.0, 10.0, WmoCode(95));
        assert_eq!(point.temperature, 15.0);
        assert_eq!(point.description, "Thunderstorm");

        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["timestampSeconds"], 1_700_000_000i64);
        assert!(json.get("feelsLike").is_none());
        assert!(json.get("humidity").is_none());
    }

    #[test]
    fn hourly_point_keeps_description_and_icon_in_sync() {
        let point = ForecastPoint::hourly(0, 1.0, -2.0, 90.0, WmoCode(12345));
        assert_eq!(point.description, "Unknown");
        assert_eq!(point.icon_id, "mdi-weather-cloudy");
        assert_eq!(point.feels_like, Some(-2.0));
        assert_eq!(point.humidity, Some(90.0));
    }

    #[test]
    fn city_match_parses_provider_payload() {
        let raw = serde_json::json!({
            "name": "London",
            "local_names": { "en": "London" },
            "lat": 51.5073,
            "lon": -0.1276,
            "country": "GB",
            "state": "England"
        });
        let city: CityMatch = serde_json::from_value(raw).unwrap();
        assert_eq!(city.name, "London");
        assert_eq!(city.country, "GB");
        assert_eq!(city.state.as_deref(), Some("England"));
    }
}
