//! TOML configuration for the `tax-calculator` binary.
//!
//! Every section and field is optional:
//!
//! ```toml
//! [provider]
//! backend = "http"
//! source = "http://localhost:5001/"
//! timeout_secs = 10
//!
//! [logging]
//! level = "info"
//! file = "tax-calculator.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tax_core::ProviderConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A bare level or any `EnvFilter` directive. `None` defers to `RUST_LOG`.
    pub level: Option<String>,
    /// Log records are appended here as well as written to stderr.
    pub file: Option<PathBuf>,
}

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub backend: Option<String>,
    pub source: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies command line values on top of this configuration.
    ///
    /// Switching backend without naming a source selects that backend's
    /// default source, since the old one belongs to a different backend.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(backend) = overrides.backend {
            if backend != self.provider.backend && overrides.source.is_none() {
                self.provider.source = default_source(&backend).to_string();
            }
            self.provider.backend = backend;
        }
        if let Some(source) = overrides.source {
            self.provider.source = source;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.provider.timeout_secs = Some(timeout_secs);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = Some(level);
        }
    }
}

/// Source used for `backend` when nothing else names one.
pub fn default_source(backend: &str) -> &'static str {
    match backend {
        "memory" => "builtin",
        "http" => tax_http::DEFAULT_BASE_URL,
        "csv" => "schedules.csv",
        _ => "",
    }
}
