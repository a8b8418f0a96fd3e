use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::{
    engine::MAX_FORECAST_DAYS,
    model::{Gender, Unit},
    provider::openweather::{DEFAULT_CURRENT_URL, DEFAULT_FORECAST_URL},
    rules::RuleTable,
};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_KEY";

/// Weather provider credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub current_url: String,
    pub forecast_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            current_url: DEFAULT_CURRENT_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout_secs: 12,
        }
    }
}

/// Request defaults used when the caller doesn't specify them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub gender: Gender,
    pub unit: Unit,
    pub days: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self { gender: Gender::Male, unit: Unit::Celsius, days: MAX_FORECAST_DAYS }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Optional TOML rule table replacing the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<PathBuf>,

    /// Example TOML:
    /// [provider]
    /// api_key = "..."
    pub provider: ProviderConfig,

    pub defaults: Defaults,
}

impl Config {
    /// Load config from disk (or defaults on first run) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        if let Ok(key) = env::var(API_KEY_ENV) {
            cfg.apply_env_api_key(&key);
        }
        Ok(cfg)
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "outfit", "outfit-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.provider.api_key = Some(api_key);
    }

    fn apply_env_api_key(&mut self, key: &str) {
        let key = key.trim();
        if !key.is_empty() {
            self.set_api_key(key.to_string());
        }
    }

    /// Returns the API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// The API key, or an error explaining how to configure one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured for the weather provider.\n\
                 Hint: run `outfit configure` or set {API_KEY_ENV}."
            )
        })
    }

    /// Checks the settings that cannot be repaired per request.
    pub fn validate(&self) -> Result<()> {
        if self.provider.current_url.trim().is_empty() {
            bail!("provider.current_url must not be empty");
        }
        if self.provider.forecast_url.trim().is_empty() {
            bail!("provider.forecast_url must not be empty");
        }
        if self.provider.timeout_secs == 0 {
            bail!("provider.timeout_secs must be at least 1");
        }
        if !(1..=MAX_FORECAST_DAYS).contains(&self.defaults.days) {
            bail!("defaults.days must be between 1 and {MAX_FORECAST_DAYS}");
        }
        Ok(())
    }

    /// The rule table at `rules_path`, or the built-in one.
    pub fn rule_table(&self) -> Result<RuleTable> {
        match &self.rules_path {
            Some(path) => RuleTable::load(path),
            None => Ok(RuleTable::builtin()),
        }
    }
}
