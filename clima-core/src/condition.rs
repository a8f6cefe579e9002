//! WMO weather code presentation and the day/night theme.
//!
//! Everything here is a pure function of its inputs. Callers pass the hour
//! (or a timestamp) explicitly; nothing reads the system clock.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::model::ConditionPresentation;

const DAY_STARTS_AT: u32 = 6;
const NIGHT_STARTS_AT: u32 = 18;

pub const UNKNOWN_LABEL: &str = "Unknown condition";
pub const UNKNOWN_ICON: &str = "unknown";

struct Condition {
    code: i32,
    label: &'static str,
    day_icon: &'static str,
    night_icon: &'static str,
}

const fn entry(
    code: i32,
    label: &'static str,
    day_icon: &'static str,
    night_icon: &'static str,
) -> Condition {
    Condition { code, label, day_icon, night_icon }
}

// Sorted by code; `lookup` relies on it for binary search.
// https://open-meteo.com/en/docs#weathervariables
const CONDITIONS: &[Condition] = &[
    entry(0, "Clear sky", "clear-day", "clear-night"),
    entry(1, "Mainly clear", "mostly-clear-day", "mostly-clear-night"),
    entry(2, "Partly cloudy", "partly-cloudy-day", "partly-cloudy-night"),
    entry(3, "Overcast", "overcast", "overcast"),
    entry(45, "Fog", "fog-day", "fog-night"),
    entry(48, "Depositing rime fog", "rime-fog", "rime-fog"),
    entry(51, "Light drizzle", "drizzle", "drizzle"),
    entry(53, "Moderate drizzle", "drizzle", "drizzle"),
    entry(55, "Dense drizzle", "drizzle", "drizzle"),
    entry(56, "Light freezing drizzle", "freezing-drizzle", "freezing-drizzle"),
    entry(57, "Dense freezing drizzle", "freezing-drizzle", "freezing-drizzle"),
    entry(61, "Slight rain", "rain", "rain"),
    entry(63, "Moderate rain", "rain", "rain"),
    entry(65, "Heavy rain", "heavy-rain", "heavy-rain"),
    entry(66, "Light freezing rain", "freezing-rain", "freezing-rain"),
    entry(67, "Heavy freezing rain", "freezing-rain", "freezing-rain"),
    entry(71, "Slight snow fall", "snow", "snow"),
    entry(73, "Moderate snow fall", "snow", "snow"),
    entry(75, "Heavy snow fall", "heavy-snow", "heavy-snow"),
    entry(77, "Snow grains", "snow-grains", "snow-grains"),
    entry(80, "Slight rain showers", "showers-day", "showers-night"),
    entry(81, "Moderate rain showers", "showers-day", "showers-night"),
    entry(82, "Violent rain showers", "heavy-showers", "heavy-showers"),
    entry(85, "Slight snow showers", "snow-showers-day", "snow-showers-night"),
    entry(86, "Heavy snow showers", "snow-showers-day", "snow-showers-night"),
    entry(95, "Thunderstorm", "thunderstorm", "thunderstorm"),
    entry(96, "Thunderstorm with slight hail", "thunderstorm-hail", "thunderstorm-hail"),
    entry(99, "Thunderstorm with heavy hail", "thunderstorm-hail", "thunderstorm-hail"),
];

fn lookup(code: i32) -> Option<&'static Condition> {
    CONDITIONS
        .binary_search_by_key(&code, |c| c.code)
        .ok()
        .map(|idx| &CONDITIONS[idx])
}

/// Label and icon key for a weather code. Total: absent or undocumented
/// codes get the "Unknown condition" fallback.
pub fn present(code: Option<i32>, is_daytime: bool) -> ConditionPresentation {
    match code.and_then(lookup) {
        Some(c) => ConditionPresentation {
            label: c.label,
            icon_key: if is_daytime { c.day_icon } else { c.night_icon },
        },
        None => ConditionPresentation { label: UNKNOWN_LABEL, icon_key: UNKNOWN_ICON },
    }
}

/// Daytime is [06:00, 18:00).
pub fn is_daytime(hour: u32) -> bool {
    (DAY_STARTS_AT..NIGHT_STARTS_AT).contains(&hour)
}

pub fn is_daytime_at<T: Timelike>(time: &T) -> bool {
    is_daytime(time.hour())
}

/// Visual theme for the page/terminal, picked from the local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Day,
    Night,
}

impl Theme {
    pub fn at(hour: u32) -> Self {
        if is_daytime(hour) { Theme::Day } else { Theme::Night }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Day => "day",
            Theme::Night => "night",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
