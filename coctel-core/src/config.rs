//! Configuration from environment variables.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::formatter::Locale;
use crate::types::DisplayUnit;

/// Default dataset directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the recipe CSV tables.
    pub data_dir: PathBuf,
    /// Default unit for volume-convertible ingredients.
    pub unit: DisplayUnit,
    pub locale: Locale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            unit: DisplayUnit::Ml,
            locale: Locale::En,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `COCTEL_DATA_DIR`: dataset directory (default: "data")
    /// - `COCTEL_UNIT`: "ml" or "oz" (default: "ml")
    /// - `COCTEL_LOCALE`: "en" or "es" (default: "en")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("COCTEL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let unit = match lookup("COCTEL_UNIT") {
            Some(v) => v.parse().map_err(|message| ConfigError::InvalidValue {
                var: "COCTEL_UNIT".to_string(),
                message,
            })?,
            None => defaults.unit,
        };

        let locale = match lookup("COCTEL_LOCALE") {
            Some(v) => v.parse().map_err(|message| ConfigError::InvalidValue {
                var: "COCTEL_LOCALE".to_string(),
                message,
            })?,
            None => defaults.locale,
        };

        Ok(Self {
            data_dir,
            unit,
            locale,
        })
    }
}
