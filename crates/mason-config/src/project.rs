//! Project Configuration (mason.toml)
//!
//! Handles project-level configuration stored in `mason.toml` at the project root.

use crate::toolchain::ToolchainConfig;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration from mason.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Build settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSettings>,

    /// Toolchain conventions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<ToolchainConfig>,
}

/// `[build]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BuildSettings {
    /// Output directory, relative to the project root (default: "_build")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Plan test executables and header checks (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_tests: Option<bool>,

    /// Plan application executables (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_apps: Option<bool>,

    /// Compile with warnings enabled (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_warnings: Option<bool>,

    /// Dependency database path, relative to the output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl BuildSettings {
    /// Merge another build table into this one
    pub fn merge(&mut self, other: &BuildSettings) {
        if other.out_dir.is_some() {
            self.out_dir = other.out_dir.clone();
        }
        if other.build_tests.is_some() {
            self.build_tests = other.build_tests;
        }
        if other.build_apps.is_some() {
            self.build_apps = other.build_apps;
        }
        if other.enable_warnings.is_some() {
            self.enable_warnings = other.enable_warnings;
        }
        if other.db_path.is_some() {
            self.db_path = other.db_path.clone();
        }
    }
}

impl ProjectConfig {
    /// Load project configuration from a file
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

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(build) = &self.build {
            if let Some(out_dir) = &build.out_dir {
                if out_dir.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "build.out_dir".to_string(),
                        reason: "output directory cannot be empty".to_string(),
                    });
                }
            }
        }

        if let Some(toolchain) = &self.toolchain {
            toolchain.validate()?;
        }

        Ok(())
    }

    /// Mutable access to the build table, creating it if absent
    pub fn build_mut(&mut self) -> &mut BuildSettings {
        self.build.get_or_insert_with(BuildSettings::default)
    }

    /// Mutable access to the toolchain table, creating it if absent
    pub fn toolchain_mut(&mut self) -> &mut ToolchainConfig {
        self.toolchain.get_or_insert_with(ToolchainConfig::default)
    }
}
