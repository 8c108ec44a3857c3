//! # App Configuration
//!
//! Configuration for one guest ordering session.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BISTRO_DB_PATH=/tmp/bistro.db                                      │
//! │     BISTRO_TAX_RATE_BPS=550                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ./bistro.toml (the mobile shell passes an explicit path)           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     20% VAT, 10s polling, required options not enforced                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bistro.toml
//! [database]
//! path = "./bistro.db"
//!
//! [checkout]
//! tax_rate_bps = 2000              # 20% French VAT
//! enforce_required_options = false
//! request_timeout_secs = 10
//!
//! [tracking]
//! poll_interval_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use bistro_core::{TaxRate, DEFAULT_VAT_RATE_BPS};
use bistro_db::DbConfig;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Database Settings
// =============================================================================

/// Where the menu and orders live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "./bistro.db".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
        }
    }
}

// =============================================================================
// Checkout Settings
// =============================================================================

/// Checkout behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// VAT rate in basis points applied to the cart subtotal.
    /// Default: 2000 (20%, French restaurant VAT).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Whether add-to-cart rejects products with unselected required option
    /// groups. Off by default: radio groups always carry a default, and menu
    /// data marking checkbox groups required is treated as advisory.
    #[serde(default)]
    pub enforce_required_options: bool,

    /// Per-call time limit on store operations during submission (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_VAT_RATE_BPS
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            tax_rate_bps: default_tax_rate_bps(),
            enforce_required_options: false,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Tracking Settings
// =============================================================================

/// Order status tracking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSettings {
    /// Interval between status polls on the tracking screen (seconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    10
}

impl Default for TrackingSettings {
    fn default() -> Self {
        TrackingSettings {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

// =============================================================================
// Main App Configuration
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database location.
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Checkout behavior.
    #[serde(default)]
    pub checkout: CheckoutSettings,

    /// Status tracking behavior.
    #[serde(default)]
    pub tracking: TrackingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (bistro.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading app config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load app config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "App config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Invalid("database path is empty".into()));
        }

        // 10000 bps = 100%; anything above is a typo, not a tax rate
        if self.checkout.tax_rate_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "tax_rate_bps must be at most 10000, got {}",
                self.checkout.tax_rate_bps
            )));
        }

        if self.checkout.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.tracking.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("BISTRO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = path;
        }

        if let Ok(bps) = std::env::var("BISTRO_TAX_RATE_BPS") {
            if let Ok(parsed) = bps.parse::<u32>() {
                debug!(tax_rate_bps = parsed, "Overriding VAT rate from environment");
                self.checkout.tax_rate_bps = parsed;
            }
        }

        if let Ok(flag) = std::env::var("BISTRO_ENFORCE_REQUIRED_OPTIONS") {
            match flag.to_lowercase().as_str() {
                "1" | "true" => self.checkout.enforce_required_options = true,
                "0" | "false" => self.checkout.enforce_required_options = false,
                _ => warn!(value = %flag, "Unknown enforce_required_options value in environment"),
            }
        }

        if let Ok(secs) = std::env::var("BISTRO_REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = secs.parse::<u64>() {
                self.checkout.request_timeout_secs = parsed;
            }
        }

        if let Ok(secs) = std::env::var("BISTRO_POLL_INTERVAL_SECS") {
            if let Ok(parsed) = secs.parse::<u64>() {
                self.tracking.poll_interval_secs = parsed;
            }
        }
    }

    /// Returns the default config file path, relative to the working
    /// directory. The mobile shell passes an explicit path instead.
    fn default_config_path() -> Option<PathBuf> {
        Some(PathBuf::from("bistro.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the VAT rate as a typed rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.checkout.tax_rate_bps)
    }

    /// Returns the per-call store timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.checkout.request_timeout_secs)
    }

    /// Returns the status poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.tracking.poll_interval_secs)
    }

    /// Returns a database configuration for the configured path.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, "./bistro.db");
        assert_eq!(config.checkout.tax_rate_bps, 2000);
        assert!(!config.checkout.enforce_required_options);
        assert_eq!(config.tracking.poll_interval_secs, 10);
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        // Absurd VAT rate should fail
        config.checkout.tax_rate_bps = 20_000;
        assert!(config.validate().is_err());
        config.checkout.tax_rate_bps = 2000;

        // Zero poll interval should fail
        config.tracking.poll_interval_secs = 0;
        assert!(config.validate().is_err());
        config.tracking.poll_interval_secs = 10;

        // Empty database path should fail
        config.database.path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[checkout]"));
        assert!(toml_str.contains("[tracking]"));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        // A file overriding one field leaves every other field at its default
        let config: AppConfig = toml::from_str("[checkout]\ntax_rate_bps = 550\n").unwrap();
        assert_eq!(config.checkout.tax_rate_bps, 550);
        assert_eq!(config.checkout.request_timeout_secs, 10);
        assert_eq!(config.database.path, "./bistro.db");
        assert_eq!(config.tracking.poll_interval_secs, 10);
    }
}
