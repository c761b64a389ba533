//! Server configuration, loadable from TOML.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

/// Config file read when `OTHELLO_API_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "othello-api.toml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address to listen on, e.g. `0.0.0.0:8000`.
    pub bind: String,
    /// Allow cross-origin requests from anywhere.
    pub cors_any_origin: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind: "0.0.0.0:8000".to_string(),
            cors_any_origin: true,
        }
    }
}

impl ApiConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ApiConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Resolve the config from the environment: `OTHELLO_API_CONFIG` names the
    /// file, `OTHELLO_API_BIND` overrides the bind address.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("OTHELLO_API_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_or_default(Path::new(&path))?;

        if let Ok(bind) = std::env::var("OTHELLO_API_BIND") {
            config.bind = bind;
            config.validate()?;
        }
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind.parse::<SocketAddr>().map_err(|_| {
            ConfigError::Validation(format!(
                "bind must be a socket address like 0.0.0.0:8000, got `{}`",
                self.bind
            ))
        })?;
        Ok(())
    }
}
