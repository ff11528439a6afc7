//! Operator configuration file handling
//!
//! The config file is TOML and holds deployment settings only: which identity
//! deploys (and therefore administers) the registry, and logging. Role
//! assignments, proposals and votes are registry state and never live here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use voting_registry::Identity;

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Config file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Registry operator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub deployment: DeploymentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Deployment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Deploying identity; becomes the initial admin
    pub deployer: Identity,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn new(deployer: Identity) -> Self {
        Self {
            deployment: DeploymentConfig { deployer },
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        write_file(path, &contents)
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(deployer: &Identity) -> String {
        format!(
            r#"# Voting Registry Configuration (Operator Settings)
#
# Deployment settings only. Roles, proposals and votes are registry state
# and are changed through registry operations, never through this file.

[deployment]
# Identity that deploys the registry. It is granted the admin role once,
# at initialization, and is the only account that can grant the proposer
# role until it hands admin to someone else.
deployer = "{deployer}"

[logging]
# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this when set.
level = "info"
"#
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path, deployer: &Identity) -> Result<(), ConfigError> {
        write_file(config_path, &Self::generate_default_toml(deployer))
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let wrap = |source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    };

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    fs::write(path, contents).map_err(wrap)
}

/// Get the default config path
///
/// ~/.local/share/voting-registry/config.toml on Linux.
pub fn default_config_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voting-registry")
        .join("config.toml")
}
