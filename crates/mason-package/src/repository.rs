//! Source distributions and the repositories that hold them

use crate::dependency::PackageId;
use crate::manifest::{PackageManifest, PACKAGE_MANIFEST_FILE};
use crate::PackageError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A source distribution unpacked on disk, ready for local building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sdist {
    pub manifest: PackageManifest,
    pub path: PathBuf,
}

impl Sdist {
    pub fn new(manifest: PackageManifest, path: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            path: path.into(),
        }
    }

    /// Load the sdist rooted at `dir` (reads `dir/package.toml`)
    pub fn from_directory(dir: &Path) -> crate::Result<Self> {
        let manifest = PackageManifest::from_file(&dir.join(PACKAGE_MANIFEST_FILE))?;
        Ok(Self::new(manifest, dir))
    }

    pub fn id(&self) -> PackageId {
        self.manifest.id()
    }
}

/// Read-only view of the available source distributions
pub trait Repository {
    /// Every sdist available under the given package name
    fn candidates(&self, name: &str) -> Vec<&Sdist>;
}

/// A repository held in memory, optionally loaded from a directory of sdists
#[derive(Debug, Clone, Default)]
pub struct LocalRepository {
    sdists: Vec<Sdist>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<dir>/*/package.toml` as an sdist.
    /// Subdirectories without a manifest are skipped.
    pub fn from_directory(dir: &Path) -> crate::Result<Self> {
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| PackageError::io(dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.join(PACKAGE_MANIFEST_FILE).is_file())
            .collect();
        entries.sort();

        let mut repo = Self::new();
        for path in entries {
            let sdist = Sdist::from_directory(&path)?;
            debug!("Found sdist {} in {}", sdist.id(), path.display());
            repo.add(sdist);
        }
        Ok(repo)
    }

    /// Add an sdist, replacing one with the same identity
    pub fn add(&mut self, sdist: Sdist) {
        let id = sdist.id();
        self.sdists.retain(|s| s.id() != id);
        self.sdists.push(sdist);
    }

    pub fn len(&self) -> usize {
        self.sdists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sdists.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sdist> {
        self.sdists.iter()
    }
}

impl Repository for LocalRepository {
    fn candidates(&self, name: &str) -> Vec<&Sdist> {
        self.sdists
            .iter()
            .filter(|s| s.manifest.name == name)
            .collect()
    }
}
