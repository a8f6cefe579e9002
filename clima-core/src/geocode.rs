//! Place name -> coordinates, via the Open-Meteo geocoding API.

use reqwest::Client;
use serde::Deserialize;

use crate::{error::WeatherError, model::GeoResult};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

#[derive(Debug, Clone)]
pub struct Geocoder {
    http: Client,
    base_url: String,
    language: String,
}

impl Geocoder {
    pub fn new(http: Client, base_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into(), language: language.into() }
    }

    /// Resolve a free-text place name to its top match.
    ///
    /// Blank queries fail with [`WeatherError::EmptyQuery`] before any
    /// request is sent.
    pub async fn resolve(&self, query: &str) -> Result<GeoResult, WeatherError> {
        let name = query.trim();
        if name.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        tracing::debug!(query = name, language = %self.language, "geocoding request");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("name", name),
                ("count", "1"),
                ("language", self.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(WeatherError::NetworkFailure)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::NetworkFailure)?;

        if !status.is_success() {
            tracing::warn!(%status, "geocoding request failed");
            return Err(WeatherError::from_status(status, &body));
        }

        let parsed: GeoResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(format!("geocoding JSON: {e}")))?;

        let place = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::NotFound { query: name.to_string() })?;

        let geo = GeoResult {
            latitude: place.latitude,
            longitude: place.longitude,
            display_name: place.name,
            country: place.country.unwrap_or_default(),
        };

        tracing::info!(place = %geo.place(), lat = geo.latitude, lon = geo.longitude, "resolved");
        Ok(geo)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    // Open-Meteo drops the key entirely when nothing matches.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_results_key_parses_as_none() {
        let parsed: GeoResponse = serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
        assert!(parsed.results.is_none());
    }

    #[test]
    fn place_without_country_parses() {
        let parsed: GeoResponse =
            serde_json::from_str(r#"{"results":[{"latitude":10,"longitude":20,"name":"X"}]}"#)
                .unwrap();
        let place = &parsed.results.unwrap()[0];
        assert_eq!(place.name, "X");
        assert!(place.country.is_none());
    }

    #[tokio::test]
    async fn whitespace_query_is_rejected_without_network() {
        // Unroutable on purpose: a request would surface as NetworkFailure.
        let geocoder = Geocoder::new(Client::new(), "http://127.0.0.1:1/search", "pt");
        for query in ["", "   ", "\t\n"] {
            let err = geocoder.resolve(query).await.unwrap_err();
            assert!(matches!(err, WeatherError::EmptyQuery), "query {query:?} gave {err:?}");
        }
    }
}
