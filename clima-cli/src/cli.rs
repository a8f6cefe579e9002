use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use clima_core::{Config, OpenMeteo, WeatherProvider};
use inquire::Text;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Current weather and 7-day forecast for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the default city and geocoding language.
    Configure,

    /// Show current weather and the forecast for a city.
    Show {
        /// City name; falls back to the configured default city.
        city: Option<String>,

        /// Print the normalized report as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Language for place names, e.g. "pt" or "en".
        #[arg(long)]
        lang: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json, lang } => show(city, json, lang).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let current_city = config.default_city.clone().unwrap_or_default();
    let city = Text::new("Default city:")
        .with_initial_value(&current_city)
        .prompt()
        .context("Failed to read default city")?;
    config.set_default_city(&city)?;

    let language = Text::new("Language for place names:")
        .with_default(&config.language)
        .prompt()
        .context("Failed to read language")?;
    config.set_language(&language)?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(city: Option<String>, json: bool, lang: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(lang) = lang {
        config.set_language(&lang)?;
    }
    tracing::debug!(language = %config.language, days = config.forecast_days, "config loaded");

    let query = match city {
        Some(city) => city,
        None => config.default_city()?.to_string(),
    };

    let provider: Box<dyn WeatherProvider> = Box::new(OpenMeteo::from_config(&config)?);
    tracing::debug!(query = %query, "looking up weather");
    let report = provider.report_for(&query).await?;
    tracing::debug!(place = %report.place, days = report.forecast.len(), "report received");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&report, Local::now().naive_local()));
    }

    Ok(())
}
