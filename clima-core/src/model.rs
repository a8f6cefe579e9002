use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// First geocoding match for a place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    pub country: String,
}

impl GeoResult {
    /// "São Paulo, Brasil", or just the name when upstream gave no country.
    pub fn place(&self) -> String {
        if self.country.is_empty() {
            self.display_name.clone()
        } else {
            format!("{}, {}", self.display_name, self.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub precipitation_mm: f64,
    pub wind_kph: f64,
    pub weather_code: i32,
    /// Local time of the observation, in the report's timezone.
    pub observed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_c: f64,
    pub min_c: f64,
    pub precipitation_mm: f64,
    pub wind_max_kph: f64,
    /// Rounded mean of the day's max and min relative humidity.
    pub humidity_avg_pct: u8,
    pub weather_code: Option<i32>,
}

/// Normalized result of one query; the only shape the front end consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub place: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub current: CurrentConditions,
    /// Chronological, in upstream order.
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionPresentation {
    pub label: &'static str,
    pub icon_key: &'static str,
}
