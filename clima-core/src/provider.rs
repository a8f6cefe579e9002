use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config, WeatherReport,
    error::WeatherError,
    forecast::{DEFAULT_FORECAST_DAYS, ForecastClient},
    geocode::Geocoder,
};

/// A source of complete weather reports for a place name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn report_for(&self, query: &str) -> Result<WeatherReport, WeatherError>;
}

/// Open-Meteo: geocode first, then fetch the forecast for the match.
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    geocoder: Geocoder,
    forecast: ForecastClient,
}

impl OpenMeteo {
    pub fn new(geocoder: Geocoder, forecast: ForecastClient) -> Self {
        Self { geocoder, forecast }
    }

    /// Public endpoints, Portuguese place names, 7-day horizon.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(WeatherError::NetworkFailure)?;

        let days = if config.forecast_days == 0 {
            DEFAULT_FORECAST_DAYS
        } else {
            config.forecast_days
        };

        Ok(Self::new(
            Geocoder::new(http.clone(), &config.geocoding_url, &config.language),
            ForecastClient::new(http, &config.forecast_url, days),
        ))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteo {
    async fn report_for(&self, query: &str) -> Result<WeatherReport, WeatherError> {
        let geo = self.geocoder.resolve(query).await?;
        self.forecast.fetch_report(&geo).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_query_fails_before_any_request() {
        let provider = OpenMeteo::with_defaults().unwrap();
        let err = provider.report_for("  ").await.unwrap_err();
        assert!(matches!(err, WeatherError::EmptyQuery));
    }
}
