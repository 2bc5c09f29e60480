//! # CLI Configuration
//!
//! Where the database lives and how reports are displayed.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                     │
//! │     --db ./shop.db                                                      │
//! │                                                                         │
//! │  2. Environment Variables                                               │
//! │     DUKA_DB_PATH=./shop.db                                              │
//! │     DUKA_CURRENCY_SYMBOL=KES                                            │
//! │                                                                         │
//! │  3. TOML Config File (--config, or)                                     │
//! │     ~/.config/ledger/config.toml (Linux)                                │
//! │     ~/Library/Application Support/com.duka.ledger/config.toml (macOS)   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                    │
//! │     Ksh, 2 decimals, en-KE dates, 2s watch interval                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! database_path = "/srv/duka/duka.db"
//!
//! [display]
//! currency_symbol = "Ksh"
//! currency_decimals = 2
//! date_format = "%d/%m/%Y"
//! month_format = "%B %Y"
//!
//! [watch]
//! poll_interval_ms = 2000
//! ```

use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use duka_core::{CurrencyFormat, DateLocale};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

/// File name of the database inside the platform data directory.
const DATABASE_FILE: &str = "duka.db";

/// Shortest accepted watch interval.
const MIN_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// Sections
// =============================================================================

/// `[storage]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file. Default: `duka.db` in the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// `[display]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Fraction digits shown for amounts (0-2).
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    /// strftime format for day and week labels.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// strftime format for month labels.
    #[serde(default = "default_month_format")]
    pub month_format: String,
}

fn default_currency_symbol() -> String {
    "Ksh".to_string()
}
fn default_currency_decimals() -> u8 {
    2
}
fn default_date_format() -> String {
    DateLocale::default().date_format
}
fn default_month_format() -> String {
    DateLocale::default().month_format
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            date_format: default_date_format(),
            month_format: default_month_format(),
        }
    }
}

/// `[watch]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    duka_store::DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for WatchSettings {
    fn default() -> Self {
        WatchSettings {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub watch: WatchSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform default if it exists)
    /// 3. Environment variables
    ///
    /// An explicitly given file must exist; the platform default may not.
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file. Missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.display.currency_decimals > 2 {
            return Err(AppError::config(format!(
                "currency_decimals must be between 0 and 2, got {}",
                self.display.currency_decimals
            )));
        }

        for (name, format) in [
            ("date_format", &self.display.date_format),
            ("month_format", &self.display.month_format),
        ] {
            if !is_valid_strftime(format) {
                return Err(AppError::config(format!(
                    "{} is not a valid date format: '{}'",
                    name, format
                )));
            }
        }

        if self.watch.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(AppError::config(format!(
                "poll_interval_ms must be at least {}",
                MIN_POLL_INTERVAL_MS
            )));
        }

        Ok(())
    }

    /// Applies `DUKA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any variable source.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("DUKA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = var("DUKA_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Some(format) = var("DUKA_DATE_FORMAT") {
            self.display.date_format = format;
        }

        if let Some(format) = var("DUKA_MONTH_FORMAT") {
            self.display.month_format = format;
        }

        if let Some(interval) = var("DUKA_POLL_INTERVAL_MS") {
            match interval.parse::<u64>() {
                Ok(ms) => self.watch.poll_interval_ms = ms,
                Err(_) => warn!(value = %interval, "Ignoring invalid DUKA_POLL_INTERVAL_MS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The database file to open. `override_path` (from `--db`) wins.
    ///
    /// The platform data directory is created when it is used.
    pub fn database_path(&self, override_path: Option<&Path>) -> AppResult<PathBuf> {
        if let Some(path) = override_path.or(self.storage.database_path.as_deref()) {
            return Ok(path.to_path_buf());
        }

        let dirs = project_dirs()
            .ok_or_else(|| AppError::config("Could not determine app data directory"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| AppError::io(data_dir, e))?;
        Ok(data_dir.join(DATABASE_FILE))
    }

    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat::new(
            self.display.currency_symbol.clone(),
            self.display.currency_decimals,
        )
    }

    pub fn locale(&self) -> DateLocale {
        DateLocale::new(
            self.display.date_format.clone(),
            self.display.month_format.clone(),
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.watch.poll_interval_ms)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "duka", "ledger")
}

fn is_valid_strftime(format: &str) -> bool {
    !format.trim().is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.display.currency_symbol, "Ksh");
        assert_eq!(config.display.date_format, "%d/%m/%Y");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [display]
            currency_symbol = "KES"

            [watch]
            poll_interval_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.display.currency_symbol, "KES");
        assert_eq!(config.display.currency_decimals, 2);
        assert_eq!(config.display.month_format, "%B %Y");
        assert_eq!(config.watch.poll_interval_ms, 500);
        assert_eq!(config.storage.database_path, None);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DUKA_DB_PATH", "/tmp/shop.db"),
            ("DUKA_CURRENCY_SYMBOL", "$"),
            ("DUKA_POLL_INTERVAL_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.database_path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.watch.poll_interval_ms, 2000);
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.display.currency_decimals = 3;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.display.date_format = "%Q".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.watch.poll_interval_ms = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_path_precedence() {
        let mut config = AppConfig::default();
        config.storage.database_path = Some(PathBuf::from("/from/config.db"));

        assert_eq!(
            config.database_path(Some(Path::new("/from/flag.db"))).unwrap(),
            PathBuf::from("/from/flag.db")
        );
        assert_eq!(config.database_path(None).unwrap(), PathBuf::from("/from/config.db"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
    }

    #[test]
    fn test_currency_and_locale() {
        let config = AppConfig::default();
        assert_eq!(
            config.currency().format(duka_core::Money::from_cents(123_450)),
            "Ksh 1,234.50"
        );
        assert_eq!(config.locale(), DateLocale::default());
    }
}
