//! Configuration loading traits and types.
//!
//! This module provides the TOML configuration used by the `wgtag` binary
//! and any collector embedding the parser.
//!
//! # Usage
//!
//! ```rust,no_run
//! use wgtag_common::config::{load_config, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = load_config(Path::new("/etc/wgtag/config.toml"))?;
//!     println!("Scanning {}", config.parser.root.display());
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_CONFIG_ROOT, MAX_LINE_LEN, SERVICE_NAME};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Matching `tracing` level.
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// Common configuration fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "wgtag-edge-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_service_name() -> String {
    SERVICE_NAME.to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parser settings (`[parser]` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserSection {
    /// Root directory walked for `*.conf` files.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Line buffer size in bytes, terminator included.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_ROOT)
}

fn default_max_line_len() -> usize {
    MAX_LINE_LEN
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_line_len: default_max_line_len(),
        }
    }
}

impl ParserSection {
    /// Validate the parser settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `root` is empty
    /// - `max_line_len` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "parser.root cannot be empty".to_string(),
            ));
        }
        if self.max_line_len == 0 {
            return Err(ConfigError::ValidationError(
                "parser.max_line_len must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level `wgtag` configuration file.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "info"
///
/// [parser]
/// root = "/etc/wireguard"
/// max_line_len = 65536
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WgtagConfig {
    /// `[shared]` table.
    #[serde(default)]
    pub shared: SharedConfig,
    /// `[parser]` table.
    #[serde(default)]
    pub parser: ParserSection,
}

impl WgtagConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.parser.validate()
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Load and validate a [`WgtagConfig`] from `path`.
pub fn load_config(path: &Path) -> Result<WgtagConfig, ConfigError> {
    let config = WgtagConfig::load(path)?;
    config.validate()?;
    debug!(
        "Loaded config from {:?}: root={:?}, max_line_len={}",
        path, config.parser.root, config.parser.max_line_len
    );
    Ok(config)
}
