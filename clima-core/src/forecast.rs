//! Coordinates -> current conditions plus a daily forecast, normalized into
//! a [`WeatherReport`].

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastDay, GeoResult, WeatherReport},
};

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,weathercode";
const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum,\
     wind_speed_10m_max,relative_humidity_2m_max,relative_humidity_2m_min";

#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    base_url: String,
    forecast_days: u8,
}

impl ForecastClient {
    pub fn new(http: Client, base_url: impl Into<String>, forecast_days: u8) -> Self {
        Self { http, base_url: base_url.into(), forecast_days }
    }

    /// One forecast request for an already-resolved place. No geocoding, no
    /// retries.
    pub async fn fetch_report(&self, geo: &GeoResult) -> Result<WeatherReport, WeatherError> {
        tracing::debug!(lat = geo.latitude, lon = geo.longitude, "forecast request");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", geo.latitude.to_string()),
                ("longitude", geo.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("forecast_days", self.forecast_days.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(WeatherError::NetworkFailure)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::NetworkFailure)?;

        if !status.is_success() {
            tracing::warn!(%status, "forecast request failed");
            return Err(WeatherError::from_status(status, &body));
        }

        let raw: RawForecast = serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(format!("forecast JSON: {e}")))?;

        let report = normalize(raw, geo)?;
        tracing::info!(place = %report.place, days = report.forecast.len(), "forecast received");
        Ok(report)
    }
}

/// Decoded forecast body, before shape validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    pub timezone: Option<String>,
    pub current: Option<RawCurrent>,
    pub daily: Option<RawDaily>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    pub time: Option<String>,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub precipitation: Option<f64>,
    pub wind_speed_10m: f64,
    #[serde(alias = "weather_code")]
    pub weathercode: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    pub wind_speed_10m_max: Vec<f64>,
    pub relative_humidity_2m_max: Vec<f64>,
    pub relative_humidity_2m_min: Vec<f64>,
}

/// Reshape a decoded body into a [`WeatherReport`].
///
/// Daily arrays are zipped by index. Upstream is trusted to keep them
/// aligned; if they are not, the day count is the shortest required array,
/// and a short or missing weather-code array just leaves `weather_code`
/// empty for the uncovered days.
///
/// Nulls are only tolerated in `weathercode` (kept as `None`) and
/// `precipitation_sum` (read as 0). A null temperature, wind or humidity
/// entry fails decoding, so the whole query ends in `MalformedResponse`.
pub fn normalize(raw: RawForecast, geo: &GeoResult) -> Result<WeatherReport, WeatherError> {
    let current = raw.current.ok_or_else(|| WeatherError::malformed("missing 'current' section"))?;
    let daily = raw.daily.ok_or_else(|| WeatherError::malformed("missing 'daily' section"))?;

    let observed_at = current.time.as_deref().map(parse_local_time).transpose()?;

    let current = CurrentConditions {
        temperature_c: current.temperature_2m,
        humidity_pct: to_pct(current.relative_humidity_2m),
        precipitation_mm: current.precipitation.unwrap_or(0.0),
        wind_kph: current.wind_speed_10m,
        weather_code: current.weathercode,
        observed_at,
    };

    let days = [
        daily.time.len(),
        daily.temperature_2m_max.len(),
        daily.temperature_2m_min.len(),
        daily.wind_speed_10m_max.len(),
        daily.relative_humidity_2m_max.len(),
        daily.relative_humidity_2m_min.len(),
    ]
    .into_iter()
    .min()
    .unwrap_or(0);

    if days != daily.time.len() {
        tracing::warn!(days, time = daily.time.len(), "daily arrays are not aligned");
    }

    let forecast = (0..days)
        .map(|i| -> Result<ForecastDay, WeatherError> {
            Ok(ForecastDay {
                date: parse_date(&daily.time[i])?,
                max_c: daily.temperature_2m_max[i],
                min_c: daily.temperature_2m_min[i],
                precipitation_mm: daily.precipitation_sum.get(i).copied().flatten().unwrap_or(0.0),
                wind_max_kph: daily.wind_speed_10m_max[i],
                humidity_avg_pct: to_pct(
                    (daily.relative_humidity_2m_max[i] + daily.relative_humidity_2m_min[i]) / 2.0,
                ),
                weather_code: daily.weathercode.get(i).copied().flatten(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherReport {
        place: geo.place(),
        latitude: geo.latitude,
        longitude: geo.longitude,
        timezone: raw.timezone,
        current,
        forecast,
    })
}

fn to_pct(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn parse_date(s: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| WeatherError::malformed(format!("invalid date '{s}': {e}")))
}

// Open-Meteo sends local ISO times without an offset, usually to the minute.
fn parse_local_time(s: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WeatherError::malformed(format!("invalid time '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sao_paulo() -> GeoResult {
        GeoResult {
            latitude: -23.55,
            longitude: -46.63,
            display_name: "São Paulo".into(),
            country: "Brasil".into(),
        }
    }

    fn daily_json() -> serde_json::Value {
        json!({
            "time": ["2024-06-01", "2024-06-02", "2024-06-03", "2024-06-04", "2024-06-05"],
            "weathercode": [0, 1, 61, 95, 3],
            "temperature_2m_max": [30, 29, 28, 27, 26],
            "temperature_2m_min": [20, 19, 18, 17, 16],
            "precipitation_sum": [0.0, 0.2, 5.1, 12.0, null],
            "wind_speed_10m_max": [10, 12, 14, 20, 8],
            "relative_humidity_2m_max": [70, 80, 90, 95, 60],
            "relative_humidity_2m_min": [55, 60, 70, 80, 40]
        })
    }

    fn raw(value: serde_json::Value) -> RawForecast {
        serde_json::from_value(value).unwrap()
    }

    fn body() -> serde_json::Value {
        json!({
            "timezone": "America/Sao_Paulo",
            "current": {
                "time": "2024-06-01T14:15",
                "temperature_2m": 25,
                "relative_humidity_2m": 65,
                "precipitation": 1.2,
                "wind_speed_10m": 15,
                "weathercode": 2
            },
            "daily": daily_json()
        })
    }

    #[test]
    fn maps_current_conditions() {
        let report = normalize(raw(body()), &sao_paulo()).unwrap();
        let current = &report.current;
        assert_eq!(current.temperature_c, 25.0);
        assert_eq!(current.humidity_pct, 65);
        assert_eq!(current.precipitation_mm, 1.2);
        assert_eq!(current.wind_kph, 15.0);
        assert_eq!(current.weather_code, 2);
        assert_eq!(
            current.observed_at,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(14, 15, 0)
        );
        assert_eq!(report.place, "São Paulo, Brasil");
        assert_eq!(report.timezone.as_deref(), Some("America/Sao_Paulo"));
    }

    #[test]
    fn missing_current_precipitation_defaults_to_zero() {
        let mut value = body();
        value["current"].as_object_mut().unwrap().remove("precipitation");
        let report = normalize(raw(value), &sao_paulo()).unwrap();
        assert_eq!(report.current.precipitation_mm, 0.0);
    }

    #[test]
    fn zips_daily_arrays_in_order() {
        let report = normalize(raw(body()), &sao_paulo()).unwrap();
        assert_eq!(report.forecast.len(), 5);

        let first = &report.forecast[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(first.max_c, 30.0);
        assert_eq!(first.min_c, 20.0);
        assert_eq!(first.weather_code, Some(0));

        let maxes: Vec<f64> = report.forecast.iter().map(|d| d.max_c).collect();
        assert_eq!(maxes, vec![30.0, 29.0, 28.0, 27.0, 26.0]);
        assert_eq!(report.forecast[4].precipitation_mm, 0.0);
    }

    #[test]
    fn humidity_average_is_rounded_mean() {
        let report = normalize(raw(body()), &sao_paulo()).unwrap();
        // (70 + 55) / 2 = 62.5
        assert_eq!(report.forecast[0].humidity_avg_pct, 63);
        assert_eq!(report.forecast[1].humidity_avg_pct, 70);
    }

    #[test]
    fn missing_sections_are_malformed() {
        for section in ["current", "daily"] {
            let mut value = body();
            value.as_object_mut().unwrap().remove(section);
            let err = normalize(raw(value), &sao_paulo()).unwrap_err();
            match err {
                WeatherError::MalformedResponse { reason } => assert!(reason.contains(section)),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn absent_or_short_weather_codes_are_none() {
        let mut value = body();
        value["daily"]["weathercode"] = json!([80, null]);
        let report = normalize(raw(value.clone()), &sao_paulo()).unwrap();
        assert_eq!(report.forecast[0].weather_code, Some(80));
        assert_eq!(report.forecast[1].weather_code, None);
        assert_eq!(report.forecast[4].weather_code, None);

        value["daily"].as_object_mut().unwrap().remove("weathercode");
        let report = normalize(raw(value), &sao_paulo()).unwrap();
        assert!(report.forecast.iter().all(|d| d.weather_code.is_none()));
    }

    #[test]
    fn accepts_snake_case_weather_code_keys() {
        let mut value = body();
        let current = value["current"].as_object_mut().unwrap();
        let code = current.remove("weathercode").unwrap();
        current.insert("weather_code".into(), code);
        let daily = value["daily"].as_object_mut().unwrap();
        let codes = daily.remove("weathercode").unwrap();
        daily.insert("weather_code".into(), codes);

        let report = normalize(raw(value), &sao_paulo()).unwrap();
        assert_eq!(report.current.weather_code, 2);
        assert_eq!(report.forecast[2].weather_code, Some(61));
    }

    #[test]
    fn misaligned_arrays_truncate_to_shortest() {
        let mut value = body();
        value["daily"]["temperature_2m_min"] = json!([20, 19, 18]);
        let report = normalize(raw(value), &sao_paulo()).unwrap();
        assert_eq!(report.forecast.len(), 3);
    }

    #[test]
    fn bad_date_is_malformed() {
        let mut value = body();
        value["daily"]["time"][0] = json!("June 1st");
        let err = normalize(raw(value), &sao_paulo()).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse { .. }));
    }

    #[test]
    fn normalizing_is_deterministic() {
        let a = normalize(raw(body()), &sao_paulo()).unwrap();
        let b = normalize(raw(body()), &sao_paulo()).unwrap();
        assert_eq!(a, b);
    }
}
