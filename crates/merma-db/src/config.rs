//! # Configuration
//!
//! Settings for the store connection and for report generation.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MERMA_DB_PATH=/var/lib/merma/merma.db                              │
//! │     MERMA_PAGE_SIZE=500                                                │
//! │     MERMA_LOCALE=en-us                                                 │
//! │     MERMA_DEFAULT_DAYS=14                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config / MERMA_CONFIG, else ./merma.toml if present              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "merma.db"
//! max_connections = 5
//! connect_timeout_secs = 30
//!
//! [report]
//! page_size = 1000
//! default_days = 7
//! locale = "es-co"
//! category_order = ["LECHE", "ARROZ"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use merma_core::validation::validate_page_size;
use merma_core::{Category, DayWindow, Locale, DEFAULT_PAGE_SIZE};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "merma.toml";

// =============================================================================
// Database Settings
// =============================================================================

/// Store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, created on first use.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("merma.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// Report Settings
// =============================================================================

/// Report generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Rows requested per page (1-1000).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Window used when the caller doesn't pick one.
    #[serde(default)]
    pub default_days: DayWindow,

    #[serde(default)]
    pub locale: Locale,

    /// Categories listed first in reports; the rest follow in the
    /// standard order.
    #[serde(default)]
    pub category_order: Vec<Category>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            page_size: default_page_size(),
            default_days: DayWindow::default(),
            locale: Locale::default(),
            category_order: Vec::new(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub report: ReportSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path`, else `MERMA_CONFIG`, else
    ///    `./merma.toml` when it exists
    /// 3. Environment variables
    ///
    /// A file that was asked for explicitly must exist.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let explicit = config_path.or_else(|| std::env::var_os("MERMA_CONFIG").map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    debug!("No config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> DbResult<Self> {
        info!(path = %path.display(), "Loading config file");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| DbError::Config(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
            .map_err(|e| DbError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parses TOML text; missing keys take their defaults.
    pub fn from_toml(contents: &str) -> DbResult<Self> {
        toml::from_str(contents).map_err(|e| DbError::Config(e.to_string()))
    }

    /// Applies `MERMA_*` overrides from `lookup`.
    ///
    /// Values that don't parse are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("MERMA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(size) = lookup("MERMA_PAGE_SIZE") {
            match size.trim().parse::<u32>() {
                Ok(size) => self.report.page_size = size,
                Err(_) => warn!(value = %size, "Ignoring non-numeric MERMA_PAGE_SIZE"),
            }
        }

        if let Some(locale) = lookup("MERMA_LOCALE") {
            match locale.parse::<Locale>() {
                Ok(locale) => self.report.locale = locale,
                Err(_) => warn!(value = %locale, "Ignoring unknown MERMA_LOCALE"),
            }
        }

        if let Some(days) = lookup("MERMA_DEFAULT_DAYS") {
            match days.trim().parse::<u32>().ok().map(DayWindow::from_days) {
                Some(Ok(window)) => self.report.default_days = window,
                _ => warn!(value = %days, "Ignoring unsupported MERMA_DEFAULT_DAYS"),
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(DbError::Config("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(DbError::Config(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        validate_page_size(self.report.page_size)?;

        Ok(())
    }

    /// Pool configuration for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::from(&self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, PathBuf::from("merma.db"));
        assert_eq!(config.report.page_size, 1000);
        assert_eq!(config.report.default_days, DayWindow::Week);
        assert_eq!(config.report.locale, Locale::EsCo);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [report]
            page_size = 500
            default_days = 14
            locale = "en-us"
            category_order = ["LECHE", "ARROZ"]
            "#,
        )
        .unwrap();

        assert_eq!(config.report.page_size, 500);
        assert_eq!(config.report.default_days, DayWindow::TwoWeeks);
        assert_eq!(config.report.locale, Locale::EnUs);
        assert_eq!(config.report.category_order, vec![Category::Leche, Category::Arroz]);
        assert_eq!(config.database, DatabaseSettings::default());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(
            AppConfig::from_toml("[report]\ndefault_days = 5"),
            Err(DbError::Config(_))
        ));
        assert!(matches!(AppConfig::from_toml("not toml ["), Err(DbError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("MERMA_DB_PATH", "/tmp/other.db"),
            ("MERMA_PAGE_SIZE", "250"),
            ("MERMA_LOCALE", "en-us"),
            ("MERMA_DEFAULT_DAYS", "30"),
        ]));

        assert_eq!(config.database.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.report.page_size, 250);
        assert_eq!(config.report.locale, Locale::EnUs);
        assert_eq!(config.report.default_days, DayWindow::Month);
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("MERMA_PAGE_SIZE", "lots"),
            ("MERMA_LOCALE", "fr-fr"),
            ("MERMA_DEFAULT_DAYS", "5"),
        ]));

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.report.page_size = 0;
        assert!(matches!(config.validate(), Err(DbError::Validation(_))));

        config.report.page_size = 1001;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(matches!(config.validate(), Err(DbError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = AppConfig::load(Some(PathBuf::from("/nonexistent/merma.toml"))).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn test_db_config_from_settings() {
        let mut config = AppConfig::default();
        config.database.max_connections = 3;
        config.database.connect_timeout_secs = 7;

        let db = config.db_config();
        assert_eq!(db.max_connections, 3);
        assert_eq!(db.acquire_timeout, Duration::from_secs(7));
        assert!(db.run_migrations);
    }
}
