//! Plain-text rendering of gateway records.

use std::fmt::Write;

use chrono::DateTime;
use meteo_core::{CityMatch, CurrentWeather, Forecast, ForecastPoint, weather_code::WMO_TABLE};

pub fn current(weather: &CurrentWeather) -> String {
    let mut out = String::new();
    let place = if weather.country_code.is_empty() {
        weather.location_name.clone()
    } else {
        format!("{}, {}", weather.location_name, weather.country_code)
    };

    let _ = writeln!(out, "{place}");
    let _ = writeln!(out, "  {} [{}]", weather.description, weather.icon_id);
    let _ = writeln!(
        out,
        "  Temperature: {:.1}°C (feels like {:.1}°C)",
        weather.temperature, weather.feels_like
    );
    let _ = writeln!(out, "  Humidity:    {:.0}%", weather.humidity);
    let _ = writeln!(out, "  Wind:        {:.1} km/h", weather.wind_speed);
    out
}

pub fn forecast(forecast: &Forecast, hours: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Hourly");
    for point in forecast.hourly.iter().take(hours) {
        let _ = writeln!(out, "{}", hourly_line(point));
    }

    let _ = writeln!(out, "\nDaily");
    for point in &forecast.daily {
        let _ = writeln!(
            out,
            "  {}  {:>6.1}°C  {}",
            format_timestamp(point.timestamp_seconds, "%a %Y-%m-%d"),
            point.temperature,
            point.description
        );
    }
    out
}

fn hourly_line(point: &ForecastPoint) -> String {
    let mut line = format!(
        "  {}  {:>6.1}°C",
        format_timestamp(point.timestamp_seconds, "%Y-%m-%d %H:%M"),
        point.temperature
    );
    if let Some(feels_like) = point.feels_like {
        let _ = write!(line, "  feels {feels_like:>5.1}°C");
    }
    if let Some(humidity) = point.humidity {
        let _ = write!(line, "  {humidity:>3.0}%");
    }
    let _ = write!(line, "  {}", point.description);
    line
}

pub fn suggestions(cities: &[CityMatch]) -> String {
    let mut out = String::new();
    for city in cities {
        let region = match city.state.as_deref() {
            Some(state) if !state.is_empty() => format!("{state}, {}", city.country),
            _ => city.country.clone(),
        };
        let _ = writeln!(
            out,
            "{} ({region})  {:.4}, {:.4}",
            city.name, city.lat, city.lon
        );
    }
    out
}

pub fn codes_table() -> String {
    let mut out = String::new();
    for entry in WMO_TABLE {
        let _ = writeln!(
            out,
            "{:>3}  {:<30}  {}",
            entry.code, entry.description, entry.icon
        );
    }
    out
}

pub fn codes_json() -> serde_json::Value {
    WMO_TABLE
        .iter()
        .map(|e| {
            serde_json::json!({
                "code": e.code,
                "description": e.description,
                "iconId": e.icon,
            })
        })
        .collect()
}

/// Timestamps are shown in UTC.
fn format_timestamp(ts: i64, fmt: &str) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_else(|| ts.to_string())
}
