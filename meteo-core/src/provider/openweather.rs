use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::model::CityMatch;

use super::CitySearch;

const SUGGESTION_LIMIT: &str = "5";

/// City suggestions backed by the OpenWeather direct geocoding API.
///
/// Unlike the weather calls, every failure here collapses into an empty list.
#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl OpenWeatherGeocoder {
    pub fn with_client(http: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            api_key,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_direct(&self, query: &str) -> Result<Vec<CityMatch>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No API key configured for OpenWeather geocoding"))?;

        let url = format!("{}/direct", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", SUGGESTION_LIMIT), ("appid", api_key)])
            .send()
            .await
            .context("Failed to send request to OpenWeather (direct geocoding)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Failed to fetch city suggestions: status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")
    }
}

#[async_trait]
impl CitySearch for OpenWeatherGeocoder {
    async fn suggest_cities(&self, query: &str) -> Vec<CityMatch> {
        match self.fetch_direct(query).await {
            Ok(cities) => {
                tracing::debug!(query, count = cities.len(), "city suggestions");
                cities
            }
            Err(e) => {
                tracing::warn!(error = ?e, query, "Error searching cities");
                Vec::new()
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer, key: Option<&str>) -> OpenWeatherGeocoder {
        OpenWeatherGeocoder::with_client(Client::new(), &server.uri(), key.map(str::to_owned))
    }

    #[tokio::test]
    async fn returns_matches_from_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/direct"))
            .and(query_param("q", "Lond"))
            .and(query_param("limit", "5"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "name": "London",
                    "lat": 51.5073,
                    "lon": -0.1276,
                    "country": "GB",
                    "state": "England"
                },
                {
                    "name": "London",
                    "lat": 42.9834,
                    "lon": -81.233,
                    "country": "CA",
                    "state": "Ontario"
                }
            ])))
            .mount(&server)
            .await;

        let cities = geocoder(&server, Some("KEY")).suggest_cities("Lond").await;
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[1].country, "CA");
    }

    #[tokio::test]
    async fn http_error_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/direct"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let cities = geocoder(&server, Some("BAD")).suggest_cities("Paris").await;
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn unparsable_body_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let cities = geocoder(&server, Some("KEY")).suggest_cities("Paris").await;
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn missing_key_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let cities = geocoder(&server, None).suggest_cities("Paris").await;
        assert!(cities.is_empty());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
