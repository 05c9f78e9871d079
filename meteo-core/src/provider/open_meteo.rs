//! Open-Meteo geocoding and forecast client.
//!
//! Both calls of an operation run one after the other; the second depends on
//! the coordinates produced by the first. Errors are logged and returned.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{GatewayError, Result},
    model::{Conditions, CurrentWeather, Forecast, ForecastPoint, Location},
    weather_code::WmoCode,
};

use super::WeatherProvider;

/// Display name used when reverse geocoding finds nothing.
pub const FALLBACK_LOCATION_NAME: &str = "Current Location";

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,relative_humidity_2m,apparent_temperature";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoProvider {
    pub fn with_client(http: Client, geocoding_url: &str, forecast_url: &str) -> Self {
        Self {
            http,
            geocoding_url: geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a city name to its first geocoding match.
    pub async fn geocode(&self, city: &str) -> Result<Location> {
        let url = format!("{}/search", self.geocoding_url);
        let parsed: GeocodingResponse = self
            .get_json(
                &url,
                &[
                    ("name", city.to_string()),
                    ("count", "1".to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
                "city data",
            )
            .await?;

        let place = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound {
                query: city.to_string(),
            })?;

        let location = Location {
            latitude: place.latitude,
            longitude: place.longitude,
            name: place.name,
            country_code: place.country.unwrap_or_default(),
        };
        tracing::info!(
            city,
            name = %location.name,
            latitude = location.latitude,
            longitude = location.longitude,
            "resolved city"
        );
        Ok(location)
    }

    /// Look up a display name and country for coordinates.
    ///
    /// A missing or empty name becomes [`FALLBACK_LOCATION_NAME`]; a missing country becomes
    /// an empty string. Only HTTP and transport failures are errors.
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<(String, String)> {
        let url = format!("{}/reverse", self.geocoding_url);
        let parsed: ReverseGeocodingResponse = self
            .get_json(
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
                "location data",
            )
            .await?;

        let (name, country) = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .map(|place| (place.name, place.country))
            .unwrap_or_default();

        let name = name.filter(|name| !name.is_empty()).unwrap_or_else(|| {
            tracing::debug!(latitude, longitude, "reverse geocoding returned no name");
            FALLBACK_LOCATION_NAME.to_string()
        });
        Ok((name, country.unwrap_or_default()))
    }

    pub async fn current_conditions(&self, latitude: f64, longitude: f64) -> Result<Conditions> {
        let url = format!("{}/forecast", self.forecast_url);
        let parsed: CurrentResponse = self
            .get_json(
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("current", CURRENT_FIELDS.to_string()),
                    ("timezone", "auto".to_string()),
                ],
                "weather data",
            )
            .await?;

        Ok(parsed.current.into())
    }

    pub async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast> {
        let url = format!("{}/forecast", self.forecast_url);
        let parsed: ForecastResponse = self
            .get_json(
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("hourly", HOURLY_FIELDS.to_string()),
                    ("daily", DAILY_FIELDS.to_string()),
                    ("timezone", "auto".to_string()),
                ],
                "forecast data",
            )
            .await?;

        normalize_forecast(parsed)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        context: &'static str,
    ) -> Result<T> {
        tracing::debug!(url, ?query, "requesting {context}");

        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(GatewayError::upstream(context, status));
        }

        Ok(res.json::<T>().await?)
    }

    async fn current_for_city(&self, city: &str) -> Result<CurrentWeather> {
        let location = self.geocode(city).await?;
        let conditions = self
            .current_conditions(location.latitude, location.longitude)
            .await?;
        Ok(CurrentWeather::new(
            location.name,
            location.country_code,
            conditions,
        ))
    }

    async fn forecast_for_city(&self, city: &str) -> Result<Forecast> {
        let location = self.geocode(city).await?;
        self.forecast(location.latitude, location.longitude).await
    }

    async fn current_at(&self, latitude: f64, longitude: f64) -> Result<CurrentWeather> {
        let conditions = self.current_conditions(latitude, longitude).await?;
        let (name, country_code) = self.reverse_geocode(latitude, longitude).await?;
        Ok(CurrentWeather::new(name, country_code, conditions))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current_by_city_name(&self, city: &str) -> Result<CurrentWeather> {
        self.current_for_city(city)
            .await
            .inspect_err(|e| tracing::error!(error = %e, city, "weather service error"))
    }

    async fn forecast_by_city_name(&self, city: &str) -> Result<Forecast> {
        self.forecast_for_city(city)
            .await
            .inspect_err(|e| tracing::error!(error = %e, city, "forecast service error"))
    }

    async fn current_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeather> {
        self.current_at(latitude, longitude).await.inspect_err(
            |e| tracing::error!(error = %e, latitude, longitude, "weather service error"),
        )
    }

    async fn forecast_by_coordinates(&self, latitude: f64, longitude: f64) -> Result<Forecast> {
        self.forecast(latitude, longitude).await.inspect_err(
            |e| tracing::error!(error = %e, latitude, longitude, "forecast service error"),
        )
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeoPlace>>,
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    name: String,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodingResponse {
    results: Option<Vec<ReversePlace>>,
}

#[derive(Debug, Deserialize)]
struct ReversePlace {
    name: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i32,
    wind_speed_10m: f64,
}

impl From<CurrentBlock> for Conditions {
    fn from(block: CurrentBlock) -> Self {
        Conditions {
            temperature: block.temperature_2m,
            feels_like: block.apparent_temperature,
            humidity: block.relative_humidity_2m,
            wind_speed: block.wind_speed_10m,
            code: WmoCode(block.weather_code),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i64,
    hourly: HourlySeries,
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    apparent_temperature: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
}

fn normalize_forecast(raw: ForecastResponse) -> Result<Forecast> {
    let offset = raw.utc_offset_seconds;

    let hourly = &raw.hourly;
    let n = hourly.time.len();
    ensure_len("hourly", "temperature_2m", n, hourly.temperature_2m.len())?;
    ensure_len("hourly", "apparent_temperature", n, hourly.apparent_temperature.len())?;
    ensure_len("hourly", "relative_humidity_2m", n, hourly.relative_humidity_2m.len())?;
    ensure_len("hourly", "weather_code", n, hourly.weather_code.len())?;

    let daily = &raw.daily;
    let m = daily.time.len();
    ensure_len("daily", "temperature_2m_max", m, daily.temperature_2m_max.len())?;
    ensure_len("daily", "temperature_2m_min", m, daily.temperature_2m_min.len())?;
    ensure_len("daily", "weather_code", m, daily.weather_code.len())?;

    let hourly_points = (0..n)
        .map(|i| {
            Ok(ForecastPoint::hourly(
                local_time_to_epoch(&hourly.time[i], offset)?,
                value_at("hourly", "temperature_2m", &hourly.temperature_2m, i)?,
                value_at("hourly", "apparent_temperature", &hourly.apparent_temperature, i)?,
                value_at("hourly", "relative_humidity_2m", &hourly.relative_humidity_2m, i)?,
                WmoCode(value_at("hourly", "weather_code", &hourly.weather_code, i)?),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let daily_points = (0..m)
        .map(|i| {
            Ok(ForecastPoint::daily(
                local_time_to_epoch(&daily.time[i], offset)?,
                value_at("daily", "temperature_2m_max", &daily.temperature_2m_max, i)?,
                value_at("daily", "temperature_2m_min", &daily.temperature_2m_min, i)?,
                WmoCode(value_at("daily", "weather_code", &daily.weather_code, i)?),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Forecast {
        hourly: hourly_points,
        daily: daily_points,
    })
}

fn ensure_len(series: &str, field: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(GatewayError::MalformedResponse(format!(
            "{series}.{field} has {actual} values but {series}.time has {expected}"
        )))
    }
}

/// Null entries are rejected rather than skipped so every point stays complete.
fn value_at<T: Copy>(series: &str, field: &str, values: &[Option<T>], i: usize) -> Result<T> {
    values[i].ok_or_else(|| {
        GatewayError::MalformedResponse(format!("{series}.{field}[{i}] is null"))
    })
}

/// Convert an Open-Meteo local wall-clock time (`timezone=auto`) to a UTC epoch.
fn local_time_to_epoch(raw: &str, utc_offset_seconds: i64) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| {
            GatewayError::MalformedResponse(format!("unrecognized time value '{raw}'"))
        })?;

    Ok(naive.and_utc().timestamp() - utc_offset_seconds)
}
