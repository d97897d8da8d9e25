//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`)
//! 2. Environment variables (`CAFE_*`)
//! 3. Defaults (this file)

use std::path::PathBuf;

use cafe_core::Money;
use cafe_db::DbConfig;
use directories::ProjectDirs;
use serde::Serialize;
use thiserror::Error;

const DEFAULT_DB_FILE: &str = "cafe.db";

/// Configuration problems detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("Could not create data directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Store name (shown on reports)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Pool size
    pub max_connections: u32,
}

impl Default for AppConfig {
    /// Defaults suitable for a single café terminal.
    ///
    /// The database path is relative until [`AppConfig::from_env`] resolves
    /// the platform data directory.
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            store_name: "Café POS".to_string(),
            currency_symbol: "R$".to_string(),
            max_connections: 5,
        }
    }
}

impl AppConfig {
    /// Creates a configuration from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `CAFE_DB_PATH`: database file (default: platform data dir)
    /// - `CAFE_STORE_NAME`: store name
    /// - `CAFE_CURRENCY_SYMBOL`: currency symbol
    /// - `CAFE_MAX_CONNECTIONS`: pool size
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        config.db_path = match lookup("CAFE_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        if let Some(store_name) = lookup("CAFE_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("CAFE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(value) = lookup("CAFE_MAX_CONNECTIONS") {
            config.max_connections = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber {
                    var: "CAFE_MAX_CONNECTIONS",
                    value,
                })?;
        }

        Ok(config)
    }

    /// Overrides the database path (from `--db`).
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path).max_connections(self.max_connections)
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_cli::config::AppConfig;
    /// use cafe_core::Money;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(2900)), "R$ 29.00");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{} {}.{:02}",
            sign,
            self.currency_symbol,
            amount.major().abs(),
            amount.minor_part().abs()
        )
    }
}

/// Platform data directory for the database file.
///
/// - **macOS**: `~/Library/Application Support/com.cafe.pos/cafe.db`
/// - **Windows**: `%APPDATA%\cafe\pos\data\cafe.db`
/// - **Linux**: `~/.local/share/pos/cafe.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("com", "cafe", "pos").ok_or(ConfigError::NoDataDir)?;
    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join(DEFAULT_DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CAFE_DB_PATH", "/tmp/pos.db"),
            ("CAFE_STORE_NAME", "Café da Esquina"),
            ("CAFE_MAX_CONNECTIONS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/pos.db"));
        assert_eq!(config.store_name, "Café da Esquina");
        assert_eq!(config.currency_symbol, "R$");
        assert_eq!(config.db_config().max_connections, 3);
    }

    #[test]
    fn test_invalid_pool_size() {
        let err = AppConfig::from_lookup(lookup(&[
            ("CAFE_DB_PATH", "/tmp/pos.db"),
            ("CAFE_MAX_CONNECTIONS", "zero"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn test_flag_beats_env() {
        let config = AppConfig::from_lookup(lookup(&[("CAFE_DB_PATH", "/tmp/env.db")]))
            .unwrap()
            .with_db_path(Some(PathBuf::from("/tmp/flag.db")));
        assert_eq!(config.db_path, PathBuf::from("/tmp/flag.db"));
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(850)), "R$ 8.50");
        assert_eq!(config.format_currency(Money::from_cents(1)), "R$ 0.01");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-R$ 12.34");
    }
}
