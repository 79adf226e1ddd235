//! Journal configuration loaded from TOML.
//!
//! # Responsibility
//! - Hold the recognized knobs with their defaults.
//! - Parse and validate configuration files.
//!
//! # Invariants
//! - A missing file yields defaults; an unreadable or invalid file is an error.
//! - Enabling delegated generation requires an endpoint.

use crate::repo::entry_repo::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default soft cap for reflection length, in code points.
pub const DEFAULT_MAX_REFLECTION_DISPLAY_LENGTH: usize = 800;
const DEFAULT_DATABASE_FILE_NAME: &str = "moodjournal.sqlite3";
const DEFAULT_DELEGATE_TIMEOUT_MS: u64 = 10_000;

/// Configuration loading/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// External generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_ms: DEFAULT_DELEGATE_TIMEOUT_MS,
        }
    }
}

/// Logging settings consumed by `init_logging`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`; build-mode default when unset.
    pub level: Option<String>,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub dir: Option<PathBuf>,
}

/// Top-level journal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub use_delegated_generation: bool,
    pub max_reflection_display_length: usize,
    pub storage_key: String,
    pub database_path: PathBuf,
    pub delegate: DelegateConfig,
    pub logging: LoggingConfig,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            use_delegated_generation: false,
            max_reflection_display_length: DEFAULT_MAX_REFLECTION_DISPLAY_LENGTH,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE_NAME),
            delegate: DelegateConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl JournalConfig {
    /// Loads configuration from `path`, or defaults when the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_reflection_display_length == 0 {
            return Err(ConfigError::Invalid(
                "max_reflection_display_length must be greater than zero".to_string(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_key cannot be empty".to_string(),
            ));
        }
        let has_endpoint = self
            .delegate
            .endpoint
            .as_deref()
            .is_some_and(|endpoint| !endpoint.trim().is_empty());
        if self.use_delegated_generation && !has_endpoint {
            return Err(ConfigError::Invalid(
                "use_delegated_generation requires delegate.endpoint".to_string(),
            ));
        }
        if self.delegate.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "delegate.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
