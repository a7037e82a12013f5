//! # Register Configuration
//!
//! Store settings read from `shopfront.toml` with environment overrides.
//!
//! ## Loading Order
//! ```text
//! defaults ──► shopfront.toml (if present) ──► SHOPFRONT_* env vars ──► validate
//! ```
//!
//! ## Example File
//! ```toml
//! [store]
//! name = "Shopfront Computer Shop"
//! currency_symbol = "₱"
//!
//! [database]
//! path = "/var/lib/shopfront/app.db"
//! busy_timeout_ms = 5000
//! max_connections = 5
//!
//! [inventory]
//! low_stock_threshold = 5
//! strict_stock = false
//! reject_missing_items = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use shopfront_core::{Money, DEFAULT_CURRENCY_SYMBOL, DEFAULT_LOW_STOCK_THRESHOLD};
use shopfront_db::{CoordinatorOptions, DbConfig, MissingItemPolicy, StockPolicy};
use thiserror::Error;
use tracing::{info, warn};

/// File name of the config inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "shopfront.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the platform config directory")]
    NoConfigDir,
}

/// Top-level register configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Shown in report headers.
    pub name: String,

    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `None` means `data/app.db` under the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Items with stock below this are listed by `low-stock`.
    pub low_stock_threshold: i64,

    /// Refuse a sale instead of clamping stock at zero.
    pub strict_stock: bool,

    /// Refuse a sale referencing a deleted inventory row.
    pub reject_missing_items: bool,
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: "Shopfront Computer Shop".to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            strict_stock: false,
            reject_missing_items: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path` (or the default location), applies
    /// environment overrides and validates the result.
    ///
    /// A missing file is not an error; defaults are used.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p),
            None => default_config_path(),
        };

        let mut config = match &path {
            Some(p) if p.exists() => {
                info!(path = %p.display(), "Loading config");
                Self::from_file(p)?
            }
            _ => AppConfig::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::load`], falling back to defaults on any error.
    pub fn load_or_default(path: Option<PathBuf>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config, using defaults: {}", e);
                AppConfig::default()
            }
        }
    }

    /// Parses a config file without env overrides or validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Applies `SHOPFRONT_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SHOPFRONT_DB_PATH") {
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("SHOPFRONT_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(value) = lookup("SHOPFRONT_LOW_STOCK") {
            self.inventory.low_stock_threshold =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    key: "SHOPFRONT_LOW_STOCK".to_string(),
                    value: value.clone(),
                })?;
        }

        if let Some(value) = lookup("SHOPFRONT_STRICT_STOCK") {
            self.inventory.strict_stock = parse_bool(&value).ok_or_else(|| ConfigError::InvalidEnv {
                key: "SHOPFRONT_STRICT_STOCK".to_string(),
                value: value.clone(),
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }
        if self.inventory.low_stock_threshold < 0 {
            return Err(ConfigError::Invalid(
                "inventory.low_stock_threshold must not be negative".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if self.database.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.busy_timeout_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Resolved database file path.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(default_database_path)
    }

    /// Storage settings derived from this config.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path())
            .max_connections(self.database.max_connections)
            .busy_timeout(Duration::from_millis(self.database.busy_timeout_ms))
    }

    /// Checkout policies derived from this config.
    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            stock_policy: if self.inventory.strict_stock {
                StockPolicy::Reject
            } else {
                StockPolicy::Clamp
            },
            missing_item_policy: if self.inventory.reject_missing_items {
                MissingItemPolicy::Reject
            } else {
                MissingItemPolicy::TreatAsZero
            },
        }
    }

    /// Formats money with the configured currency symbol.
    ///
    /// ```rust,ignore
    /// config.format_money(Money::from_cents(123450)) // "₱1234.50"
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with(&self.store.currency_symbol)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "shopfront", "pos")
}

/// `shopfront.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// `data/app.db` under the platform data directory, or relative to the
/// working directory when no home directory is available.
pub fn default_database_path() -> PathBuf {
    let base = match project_dirs() {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => PathBuf::from("."),
    };
    base.join("data").join("app.db")
}
