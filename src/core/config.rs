use crate::core::currency::Currency;
use crate::core::exchange::{DEFAULT_CONCURRENCY, DEFAULT_LOOKBACK_MONTHS};
use crate::providers::cnb::{CnbFeed, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CURRENCIES: [&str; 9] = [
    "USD", "EUR", "CZK", "JPY", "KES", "RUB", "THB", "TRY", "XYZ",
];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub lookback_months: u32,
    pub concurrency: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            lookback_months: DEFAULT_LOOKBACK_MONTHS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl FeedConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("feed.timeout_secs must be at least 1");
        }
        if self.lookback_months == 0 {
            anyhow::bail!("feed.lookback_months must be at least 1");
        }
        Ok(())
    }

    pub fn connector(&self) -> CnbFeed {
        CnbFeed::new(&self.base_url, Duration::from_secs(self.timeout_secs))
    }
}

/// Rates are always quoted in the feed's own currency, so there is no key for
/// it here; unknown keys are rejected rather than silently ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub currencies: Vec<Currency>,
    pub feed: FeedConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currencies: DEFAULT_CURRENCIES
                .iter()
                .filter_map(|code| Currency::new(code).ok())
                .collect(),
            feed: FeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("cz", "cnb-rates", "cnb-rates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .feed
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
