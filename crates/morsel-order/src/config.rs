//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MORSEL_TAX_RATE=0.08                                               │
//! │     MORSEL_SINK_TIMEOUT_SECS=15                                        │
//! │     MORSEL_MENU_PATH / MORSEL_ORDERS_PATH                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $MORSEL_CONFIG, or the platform config dir:                        │
//! │     ~/.config/morsel/morsel.toml (Linux)                               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     tax_rate = 0.08, no sink timeout                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # morsel.toml
//! tax_rate = 0.08          # fraction in [0, 1)
//! sink_timeout_secs = 15   # omit for no bound
//! menu_path = "menu.json"
//! orders_path = "orders.jsonl"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use morsel_core::validation::validate_tax_fraction;
use morsel_core::TaxRate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

fn default_tax_rate() -> f64 {
    morsel_core::DEFAULT_TAX_RATE_BPS as f64 / 10_000.0
}

fn default_menu_path() -> PathBuf {
    PathBuf::from("menu.json")
}

fn default_orders_path() -> PathBuf {
    PathBuf::from("orders.jsonl")
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Flat sales tax as a fraction in `[0, 1)`.
    #[serde(default = "default_tax_rate", alias = "taxRate")]
    pub tax_rate: f64,

    /// Upper bound on a single order sink call. `None` waits indefinitely.
    #[serde(default, alias = "sinkTimeoutSecs")]
    pub sink_timeout_secs: Option<u64>,

    /// JSON file of menu documents read by the kiosk.
    #[serde(default = "default_menu_path")]
    pub menu_path: PathBuf,

    /// JSON-lines file the kiosk appends submitted orders to.
    #[serde(default = "default_orders_path")]
    pub orders_path: PathBuf,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            tax_rate: default_tax_rate(),
            sink_timeout_secs: None,
            menu_path: default_menu_path(),
            orders_path: default_orders_path(),
        }
    }
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`morsel.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("MORSEL_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; missing keys fall back to defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_tax_fraction(self.tax_rate)?;

        if self.sink_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "sink_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `MORSEL_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("MORSEL_TAX_RATE") {
            match raw.trim().parse::<f64>() {
                Ok(rate) => {
                    debug!(tax_rate = rate, "Overriding tax rate from environment");
                    self.tax_rate = rate;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparseable MORSEL_TAX_RATE"),
            }
        }

        if let Some(raw) = lookup("MORSEL_SINK_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.sink_timeout_secs = Some(secs),
                Err(_) => warn!(value = %raw, "Ignoring unparseable MORSEL_SINK_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = lookup("MORSEL_MENU_PATH") {
            self.menu_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("MORSEL_ORDERS_PATH") {
            self.orders_path = PathBuf::from(path);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "morsel", "morsel")
            .map(|dirs| dirs.config_dir().join("morsel.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The configured rate as basis points. Call after [`validate`](Self::validate).
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_fraction(self.tax_rate)
    }

    pub fn sink_timeout(&self) -> Option<Duration> {
        self.sink_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.tax_rate().bps(), 800);
        assert_eq!(config.sink_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_file_uses_defaults() {
        let config = StorefrontConfig::from_toml("sink_timeout_secs = 10\n").unwrap();
        assert_eq!(config.tax_rate().bps(), 800);
        assert_eq!(config.sink_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.menu_path, PathBuf::from("menu.json"));
    }

    #[test]
    fn test_toml_accepts_camel_case_tax_rate() {
        let config = StorefrontConfig::from_toml("taxRate = 0.0725\n").unwrap();
        assert_eq!(config.tax_rate().bps(), 725);
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();

        config.tax_rate = 1.0;
        assert!(config.validate().is_err());

        config.tax_rate = -0.1;
        assert!(config.validate().is_err());

        config.tax_rate = 0.0;
        assert!(config.validate().is_ok());

        config.sink_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("MORSEL_TAX_RATE", "0.05"),
            ("MORSEL_SINK_TIMEOUT_SECS", "30"),
            ("MORSEL_ORDERS_PATH", "/tmp/orders.jsonl"),
        ]
        .into_iter()
        .collect();

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.tax_rate().bps(), 500);
        assert_eq!(config.sink_timeout_secs, Some(30));
        assert_eq!(config.orders_path, PathBuf::from("/tmp/orders.jsonl"));
        assert_eq!(config.menu_path, PathBuf::from("menu.json"));
    }

    #[test]
    fn test_unparseable_override_is_ignored() {
        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| (key == "MORSEL_TAX_RATE").then(|| "eight".to_string()));
        assert_eq!(config.tax_rate().bps(), 800);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = StorefrontConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("tax_rate"));
    }

    #[test]
    fn test_load_or_default_falls_back_on_bad_file() {
        let path = std::env::temp_dir().join(format!("morsel-{}-bad.toml", std::process::id()));
        std::fs::write(&path, "tax_rate = 1.5\n").unwrap();

        assert!(StorefrontConfig::load(Some(path.clone())).is_err());
        let config = StorefrontConfig::load_or_default(Some(path.clone()));
        assert_eq!(config, StorefrontConfig::default());

        std::fs::remove_file(&path).unwrap();
    }
}
