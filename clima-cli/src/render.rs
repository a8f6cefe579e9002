//! Plain-text rendering of a [`WeatherReport`].
//!
//! `now` is always passed in so output is reproducible in tests.

use std::fmt::{self, Write};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use clima_core::{ForecastDay, Theme, WeatherReport, is_daytime_at, present};

pub fn render_report(report: &WeatherReport, now: NaiveDateTime) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report, now);
    out
}

fn write_report(out: &mut String, report: &WeatherReport, now: NaiveDateTime) -> fmt::Result {
    let current = &report.current;

    // Day/night follows the observation's local hour when we have it.
    let reference = current.observed_at.unwrap_or(now);
    let theme = Theme::at(reference.hour());
    let condition = present(Some(current.weather_code), is_daytime_at(&reference));

    match &report.timezone {
        Some(tz) => writeln!(out, "{} ({tz})", report.place)?,
        None => writeln!(out, "{}", report.place)?,
    }
    writeln!(out, "Theme: {theme}")?;
    writeln!(
        out,
        "Now: {:.1}°C  {} [{}]",
        current.temperature_c, condition.label, condition.icon_key
    )?;
    writeln!(
        out,
        "  Humidity {}%  Precipitation {:.1} mm  Wind {:.1} km/h",
        current.humidity_pct, current.precipitation_mm, current.wind_kph
    )?;
    if let Some(at) = current.observed_at {
        writeln!(out, "  Observed {}", at.format("%Y-%m-%d %H:%M"))?;
    }

    if !report.forecast.is_empty() {
        // Forecast dates are in the report's timezone, not the machine's.
        let today = reference.date();
        writeln!(out)?;
        writeln!(out, "Forecast")?;
        for day in &report.forecast {
            writeln!(out, "  {}", forecast_card(day, today))?;
        }
    }

    Ok(())
}

/// One line per day. Daily summaries always use the daytime icon.
fn forecast_card(day: &ForecastDay, today: NaiveDate) -> String {
    let condition = present(day.weather_code, true);
    format!(
        "{:<10} {:<30} {:>3}° / {:>3}°  {:>5.1} mm  {:>3.0} km/h  {:>3}%  [{}]",
        day_label(day.date, today),
        condition.label,
        day.max_c.round() as i64,
        day.min_c.round() as i64,
        day.precipitation_mm,
        day.wind_max_kph,
        day.humidity_avg_pct,
        condition.icon_key,
    )
}

fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else {
        date.format("%a %d/%m").to_string()
    }
}
