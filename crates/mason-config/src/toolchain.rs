//! Toolchain conventions
//!
//! The planner never runs a compiler, but it still has to name the files a
//! compiler would produce. These conventions live here.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default leader emitted by MSVC's `/showIncludes`
pub const DEFAULT_MSVC_DEPS_LEADER: &str = "Note: including file:";

/// How the compiler reports the files a translation unit included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepsMode {
    /// No dependency tracking; every build is a full build
    None,
    /// Make-rule listing written next to the object (`-MD -MF`)
    #[default]
    Gnu,
    /// Include lines interleaved with the compiler's diagnostics
    Msvc,
}

impl fmt::Display for DepsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Gnu => write!(f, "gnu"),
            Self::Msvc => write!(f, "msvc"),
        }
    }
}

impl FromStr for DepsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "gnu" => Ok(Self::Gnu),
            "msvc" => Ok(Self::Msvc),
            other => Err(ConfigError::InvalidValue {
                field: "toolchain.deps_mode".to_string(),
                reason: format!("must be 'none', 'gnu', or 'msvc', got '{}'", other),
            }),
        }
    }
}

/// `[toolchain]` table as written in a configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Suffix appended to object files (default: ".o")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_suffix: Option<String>,

    /// Prefix of static archive names (default: "lib")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_prefix: Option<String>,

    /// Suffix of static archive names (default: ".a")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_suffix: Option<String>,

    /// Suffix of executables (default: "")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exe_suffix: Option<String>,

    /// Dependency-listing mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deps_mode: Option<DepsMode>,

    /// Leader string for inline include listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msvc_deps_leader: Option<String>,
}

impl ToolchainConfig {
    /// Validate the toolchain table
    pub fn validate(&self) -> ConfigResult<()> {
        let suffixes = [
            ("toolchain.object_suffix", &self.object_suffix),
            ("toolchain.archive_prefix", &self.archive_prefix),
            ("toolchain.archive_suffix", &self.archive_suffix),
            ("toolchain.exe_suffix", &self.exe_suffix),
        ];
        for (field, value) in suffixes {
            if let Some(value) = value {
                if value.contains(['/', '\\']) {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        reason: format!("'{}' must not contain a path separator", value),
                    });
                }
            }
        }

        if let Some(leader) = &self.msvc_deps_leader {
            if leader.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "toolchain.msvc_deps_leader".to_string(),
                    reason: "leader cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Merge another toolchain table into this one.
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &ToolchainConfig) {
        if other.object_suffix.is_some() {
            self.object_suffix = other.object_suffix.clone();
        }
        if other.archive_prefix.is_some() {
            self.archive_prefix = other.archive_prefix.clone();
        }
        if other.archive_suffix.is_some() {
            self.archive_suffix = other.archive_suffix.clone();
        }
        if other.exe_suffix.is_some() {
            self.exe_suffix = other.exe_suffix.clone();
        }
        if other.deps_mode.is_some() {
            self.deps_mode = other.deps_mode;
        }
        if other.msvc_deps_leader.is_some() {
            self.msvc_deps_leader = other.msvc_deps_leader.clone();
        }
    }
}

/// Fully resolved toolchain conventions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    pub object_suffix: String,
    pub archive_prefix: String,
    pub archive_suffix: String,
    pub exe_suffix: String,
    pub deps_mode: DepsMode,
    pub msvc_deps_leader: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            object_suffix: ".o".to_string(),
            archive_prefix: "lib".to_string(),
            archive_suffix: ".a".to_string(),
            exe_suffix: String::new(),
            deps_mode: DepsMode::Gnu,
            msvc_deps_leader: DEFAULT_MSVC_DEPS_LEADER.to_string(),
        }
    }
}

impl Toolchain {
    /// Resolve a toolchain table against the built-in defaults
    pub fn from_config(config: &ToolchainConfig) -> Self {
        let defaults = Self::default();
        Self {
            object_suffix: config
                .object_suffix
                .clone()
                .unwrap_or(defaults.object_suffix),
            archive_prefix: config
                .archive_prefix
                .clone()
                .unwrap_or(defaults.archive_prefix),
            archive_suffix: config
                .archive_suffix
                .clone()
                .unwrap_or(defaults.archive_suffix),
            exe_suffix: config.exe_suffix.clone().unwrap_or(defaults.exe_suffix),
            deps_mode: config.deps_mode.unwrap_or(defaults.deps_mode),
            msvc_deps_leader: config
                .msvc_deps_leader
                .clone()
                .unwrap_or(defaults.msvc_deps_leader),
        }
    }

    /// File name of the static archive for a library
    pub fn archive_file_name(&self, name: &str) -> String {
        format!("{}{}{}", self.archive_prefix, name, self.archive_suffix)
    }

    /// File name of an executable
    pub fn exe_file_name(&self, name: &str) -> String {
        format!("{}{}", name, self.exe_suffix)
    }
}
