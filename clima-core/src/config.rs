use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{forecast::DEFAULT_FORECAST_DAYS, forecast::FORECAST_URL, geocode::GEOCODING_URL};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "Lisboa"
/// language = "pt"
/// forecast_days = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// City used by `clima show` when no city is given.
    pub default_city: Option<String>,

    /// Language for geocoding results, e.g. "pt" or "en".
    pub language: String,

    pub forecast_days: u8,

    /// Transport timeout for each request.
    pub timeout_secs: u64,

    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: None,
            language: "pt".to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            timeout_secs: 10,
            geocoding_url: GEOCODING_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
        }
    }
}

impl Config {
    pub fn default_city(&self) -> Result<&str> {
        self.default_city.as_deref().ok_or_else(|| {
            anyhow!(
                "No city given and no default city configured.\n\
                 Hint: run `clima show <city>` or `clima configure` first."
            )
        })
    }

    pub fn set_default_city(&mut self, city: &str) -> Result<()> {
        let city = city.trim();
        if city.is_empty() {
            return Err(anyhow!("Default city must not be empty"));
        }
        self.default_city = Some(city.to_string());
        Ok(())
    }

    pub fn set_language(&mut self, language: &str) -> Result<()> {
        let language = language.trim();
        if language.is_empty() {
            return Err(anyhow!("Language must not be empty"));
        }
        self.language = language.to_string();
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "clima", "clima")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
