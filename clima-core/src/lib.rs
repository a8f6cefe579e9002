//! Core library for the `clima` CLI.
//!
//! This crate defines:
//! - The two-stage Open-Meteo lookup (geocode, then forecast)
//! - Normalization of the forecast body into a stable [`WeatherReport`]
//! - Weather code presentation and the day/night theme
//! - Configuration handling
//!
//! It is used by `clima-cli`, but has no dependency on any front end.

pub mod condition;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod model;
pub mod provider;

pub use condition::{Theme, is_daytime, is_daytime_at, present};
pub use config::Config;
pub use error::WeatherError;
pub use forecast::{ForecastClient, normalize};
pub use geocode::Geocoder;
pub use model::{
    ConditionPresentation, CurrentConditions, ForecastDay, GeoResult, WeatherReport,
};
pub use provider::{OpenMeteo, WeatherProvider};
