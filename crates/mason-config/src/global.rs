//! Global Configuration (~/.mason/config.toml)
//!
//! Handles user-level configuration stored in `~/.mason/config.toml`.
//! Only toolchain defaults live here; build settings are per project.

use crate::toolchain::ToolchainConfig;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.mason/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default toolchain conventions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<ToolchainConfig>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        if let Some(toolchain) = &config.toolchain {
            toolchain.validate()?;
        }
        Ok(config)
    }

    /// Get the global config file path (~/.mason/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".mason").join("config.toml"))
    }
}
