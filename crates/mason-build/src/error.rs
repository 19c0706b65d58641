/// Build planning error types
use crate::db::DbError;
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to read manifest at {path}: {error}")]
    ManifestReadError { path: PathBuf, error: String },

    #[error("Duplicate library '{name}' in build plan")]
    DuplicateLibrary { name: String },

    #[error("Failed to scan source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Dependency database error: {0}")]
    Database(#[from] DbError),

    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl BuildError {
    /// Create a manifest read error
    pub fn manifest_read(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::ManifestReadError {
            path: path.into(),
            error: error.to_string(),
        }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }
}
