//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::ProjectConfig;
use crate::toolchain::{DepsMode, Toolchain, ToolchainConfig};
use crate::{ConfigError, ConfigResult, PROJECT_CONFIG_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Default output directory, relative to the project root
pub const DEFAULT_OUT_DIR: &str = "_build";

/// Default dependency database file, relative to the output directory
pub const DEFAULT_DB_FILE: &str = ".mason-deps.db";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.mason/config.toml) - lowest priority
/// 2. Project config (./mason.toml) - overrides global
/// 3. Environment variables (MASON_*) - overrides project
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration (environment overrides already applied)
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Project root directory (where mason.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use an explicit global config file instead of ~/.mason/config.toml
    pub fn with_global_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find mason.toml, then loads and merges
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;

        // Global config is optional
        let global_config = self.load_global_config().unwrap_or_default();

        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let global_config = self.load_global_config().unwrap_or_default();
        let project_config = self.apply_env_overrides(project_config)?;

        let project_root = config_path.parent().map(|p| p.to_path_buf());

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Find project configuration by walking up directory tree
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Load global configuration
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Apply environment variable overrides to project config
    ///
    /// Recognized variables: MASON_OUT_DIR, MASON_BUILD_TESTS, MASON_BUILD_APPS,
    /// MASON_WARNINGS, MASON_DEPS_MODE
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(out_dir) = env::var("MASON_OUT_DIR") {
            if out_dir.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "MASON_OUT_DIR".to_string(),
                    reason: "output directory cannot be empty".to_string(),
                });
            }
            config.build_mut().out_dir = Some(PathBuf::from(out_dir));
        }

        if let Ok(value) = env::var("MASON_BUILD_TESTS") {
            config.build_mut().build_tests = Some(parse_bool(&value));
        }

        if let Ok(value) = env::var("MASON_BUILD_APPS") {
            config.build_mut().build_apps = Some(parse_bool(&value));
        }

        if let Ok(value) = env::var("MASON_WARNINGS") {
            config.build_mut().enable_warnings = Some(parse_bool(&value));
        }

        if let Ok(value) = env::var("MASON_DEPS_MODE") {
            config.toolchain_mut().deps_mode = Some(value.parse::<DepsMode>()?);
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

impl Config {
    /// Resolved toolchain (defaults < global < project)
    pub fn toolchain(&self) -> Toolchain {
        let mut merged = ToolchainConfig::default();
        if let Some(global) = &self.global.toolchain {
            merged.merge(global);
        }
        if let Some(project) = &self.project.toolchain {
            merged.merge(project);
        }
        Toolchain::from_config(&merged)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if this is a project (has mason.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Output directory, relative to the project root
    pub fn out_dir(&self) -> PathBuf {
        self.project
            .build
            .as_ref()
            .and_then(|b| b.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
    }

    /// Dependency database location, relative to the project root
    pub fn db_path(&self) -> PathBuf {
        let file = self
            .project
            .build
            .as_ref()
            .and_then(|b| b.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
        self.out_dir().join(file)
    }

    pub fn build_tests(&self) -> bool {
        self.project
            .build
            .as_ref()
            .and_then(|b| b.build_tests)
            .unwrap_or(true)
    }

    pub fn build_apps(&self) -> bool {
        self.project
            .build
            .as_ref()
            .and_then(|b| b.build_apps)
            .unwrap_or(true)
    }

    pub fn enable_warnings(&self) -> bool {
        self.project
            .build
            .as_ref()
            .and_then(|b| b.enable_warnings)
            .unwrap_or(true)
    }
}
