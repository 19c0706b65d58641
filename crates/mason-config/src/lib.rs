//! Mason Configuration System
//!
//! Provides the settings that shape a build plan:
//! - Project configuration (mason.toml)
//! - Global user configuration (~/.mason/config.toml)
//! - Toolchain conventions (artifact suffixes, dependency-listing mode)
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config (~/.mason/config.toml)
//! 3. Project config (./mason.toml)
//! 4. Environment variables (MASON_*)
//!
//! # Example
//!
//! ```no_run
//! use mason_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! let toolchain = config.toolchain();
//! ```

pub mod global;
pub mod loader;
pub mod project;
pub mod toolchain;

use std::path::PathBuf;
use thiserror::Error;

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = "mason.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use global::GlobalConfig;
pub use loader::{Config, ConfigLoader};
pub use project::{BuildSettings, ProjectConfig};
pub use toolchain::{DepsMode, Toolchain, ToolchainConfig};
