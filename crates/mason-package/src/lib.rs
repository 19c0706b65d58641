//! Mason Package Management
//!
//! Package and library manifests, source distributions (sdists), and the
//! dependency resolver that turns a set of requirements into a flat,
//! deduplicated list of sdists to build.

pub mod dependency;
pub mod manifest;
pub mod repository;
pub mod resolver;

use std::path::PathBuf;

pub use dependency::{Dependency, PackageId, VersionStrength};
pub use manifest::{LibraryManifest, PackageManifest, Usage};
pub use repository::{LocalRepository, Repository, Sdist};
pub use resolver::{find_all_dependencies, find_dependencies, ResolveError, ResolveResult};

/// Package management errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Failed to parse {path}: {error}")]
    ParseError {
        path: PathBuf,
        error: toml::de::Error,
    },

    #[error("Failed to read {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Semver error: {0}")]
    SemverError(#[from] semver::Error),

    #[error("Invalid dependency string '{input}': {reason}")]
    InvalidDependency { input: String, reason: String },

    #[error("Invalid usage requirement '{0}': expected '<namespace>/<name>'")]
    InvalidUsage(String),

    #[error("Invalid field value: {field} - {reason}")]
    InvalidField { field: String, reason: String },
}

impl PackageError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackageError>;
