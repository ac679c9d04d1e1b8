//! Configuration module for stepdefs
//!
//! Configuration can be loaded from TOML files and/or environment variables.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.stepdefs/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".stepdefs").join("config.toml"))
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Compiled game script that is scanned for step definitions
    #[serde(default = "default_game_compiled")]
    pub game_compiled: String,

    /// JSON dump of the curated type catalog
    #[serde(default = "default_typedefs")]
    pub typedefs: String,

    /// Checkout of the declaration tree whose module headers are preserved
    #[serde(default = "default_ultimate_typedefs")]
    pub ultimate_typedefs: String,

    /// Directory the generated declaration modules are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

/// Knobs of the inference engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Refine field types from `this.x = ...` assignments inside `init`
    #[serde(default = "default_init_field_inference")]
    pub init_field_inference: bool,

    /// Treat an option descriptor carrying `_default` as optional
    #[serde(default = "default_default_implies_optional")]
    pub default_implies_optional: bool,

    /// Callee prefix of a module registration call
    #[serde(default = "default_module_marker")]
    pub module_marker: String,

    /// Name of the call that receives the module body
    #[serde(default = "default_defines_marker")]
    pub defines_marker: String,

    /// How far below the top level registration calls are searched for
    #[serde(default = "default_root_scan_depth")]
    pub root_scan_depth: usize,

    /// Longest parent chain the resolver follows before failing
    #[serde(default = "default_max_parent_depth")]
    pub max_parent_depth: usize,
}

/// Declaration writer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Maximum number of module files written at the same time
    #[serde(default = "default_concurrent_writes")]
    pub concurrent_writes: usize,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            game_compiled: default_game_compiled(),
            typedefs: default_typedefs(),
            ultimate_typedefs: default_ultimate_typedefs(),
            out_dir: default_out_dir(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            init_field_inference: default_init_field_inference(),
            default_implies_optional: default_default_implies_optional(),
            module_marker: default_module_marker(),
            defines_marker: default_defines_marker(),
            root_scan_depth: default_root_scan_depth(),
            max_parent_depth: default_max_parent_depth(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            concurrent_writes: default_concurrent_writes(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        self.inference.validate()?;

        if self.output.concurrent_writes == 0 {
            return Err(Error::config(
                "output.concurrent_writes must be greater than 0".to_string(),
            ));
        }

        if self.paths.game_compiled.trim().is_empty() {
            return Err(Error::config("paths.game_compiled must not be empty"));
        }

        Ok(())
    }
}

impl InferenceConfig {
    /// Validates the engine settings
    pub fn validate(&self) -> Result<()> {
        if self.module_marker.trim().is_empty() {
            return Err(Error::config("inference.module_marker must not be empty"));
        }
        if self.defines_marker.trim().is_empty() {
            return Err(Error::config("inference.defines_marker must not be empty"));
        }
        if self.root_scan_depth == 0 {
            return Err(Error::config(
                "inference.root_scan_depth must be greater than 0",
            ));
        }
        if self.max_parent_depth == 0 {
            return Err(Error::config(
                "inference.max_parent_depth must be greater than 0",
            ));
        }
        Ok(())
    }
}
