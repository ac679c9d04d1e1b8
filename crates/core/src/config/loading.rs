//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, Environment, File};
use std::path::Path;
use tracing::debug;

use super::{global_config_path, Config};

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `STEPDEFS_` and use double underscores
    /// for nested values. For example:
    /// - `STEPDEFS_PATHS__OUT_DIR=/tmp/out`
    /// - `STEPDEFS_INFERENCE__INIT_FIELD_INFERENCE=false`
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigLib::builder();

        // Add the config file if it exists
        if path.exists() {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path));
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix("STEPDEFS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.stepdefs/config.toml or custom --config path)
    /// 3. Environment variables (STEPDEFS_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
