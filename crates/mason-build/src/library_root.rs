//! Library directory layout: `src/`, `include/` and an optional `library.toml`
use crate::error::{BuildError, BuildResult};
use crate::rules::CompileFileRules;
use crate::source::{RootRole, SourceFile, SourceRoot};
use mason_package::manifest::LIBRARY_MANIFEST_FILE;
use mason_package::LibraryManifest;
use std::fs;
use std::path::{Path, PathBuf};

/// A scanned library directory
///
/// Built once by [`LibraryRoot::from_directory`]; the sources are a snapshot
/// of the tree at that point.
#[derive(Debug, Clone)]
pub struct LibraryRoot {
    path: PathBuf,
    path_namespace: PathBuf,
    manifest: LibraryManifest,
    sources: Vec<SourceFile>,
}

impl LibraryRoot {
    /// Scan `dir` as a library. `namespace` is the subdirectory its outputs
    /// are placed under within a build directory.
    ///
    /// Without a `library.toml` the library is named after the directory.
    pub fn from_directory(dir: &Path, namespace: impl Into<PathBuf>) -> BuildResult<Self> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_directory_named(dir, namespace, &name)
    }

    /// Like [`LibraryRoot::from_directory`], naming a library that has no
    /// `library.toml` `default_name`
    pub fn from_directory_named(
        dir: &Path,
        namespace: impl Into<PathBuf>,
        default_name: &str,
    ) -> BuildResult<Self> {
        let manifest_path = dir.join(LIBRARY_MANIFEST_FILE);
        let manifest = if manifest_path.is_file() {
            LibraryManifest::from_file(&manifest_path)
                .map_err(|e| BuildError::manifest_read(&manifest_path, e))?
        } else {
            tracing::debug!(
                "No {} in {}, generating manifest for '{}'",
                LIBRARY_MANIFEST_FILE,
                dir.display(),
                default_name
            );
            LibraryManifest::generated(default_name)
        };

        let mut lib = Self {
            path: dir.to_path_buf(),
            path_namespace: namespace.into(),
            manifest,
            sources: Vec::new(),
        };

        let mut sources = lib.src_source_root().collect_sources()?;
        sources.extend(lib.include_source_root().collect_sources()?);
        sources.sort_by(|a, b| a.path.cmp(&b.path));
        lib.sources = sources;

        Ok(lib)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_namespace(&self) -> &Path {
        &self.path_namespace
    }

    pub fn manifest(&self) -> &LibraryManifest {
        &self.manifest
    }

    /// Every source found under `src/` and `include/`, sorted by path
    pub fn all_sources(&self) -> &[SourceFile] {
        &self.sources
    }

    pub fn src_source_root(&self) -> SourceRoot {
        SourceRoot::new(self.path.join("src"), RootRole::Src)
    }

    pub fn include_source_root(&self) -> SourceRoot {
        SourceRoot::new(self.path.join("include"), RootRole::Include)
    }

    /// The directory dependents put on their include path. Libraries without
    /// an `include/` directory expose `src/` instead.
    pub fn public_include_dir(&self) -> PathBuf {
        let include = self.include_source_root();
        if include.exists() {
            include.path
        } else {
            self.src_source_root().path
        }
    }

    pub fn private_include_dir(&self) -> PathBuf {
        self.src_source_root().path
    }

    /// Rules every compilation that sees this library needs
    pub fn public_compile_rules(&self) -> CompileFileRules {
        CompileFileRules::default().with_include_dir(self.public_include_dir())
    }
}

fn looks_like_library(dir: &Path) -> bool {
    dir.join("src").is_dir()
        || dir.join("include").is_dir()
        || dir.join(LIBRARY_MANIFEST_FILE).is_file()
}

/// Find every library within the package directory `root`.
///
/// The package directory itself is a library if it has `src/`, `include/` or
/// a `library.toml`; without a manifest it is named `package_name`. Each
/// directory directly under `libs/` is a library too.
pub fn collect_libraries(root: &Path, package_name: &str) -> BuildResult<Vec<LibraryRoot>> {
    let mut libs = Vec::new();

    if looks_like_library(root) {
        libs.push(LibraryRoot::from_directory_named(root, "", package_name)?);
    }

    let libs_dir = root.join("libs");
    if libs_dir.is_dir() {
        let entries = fs::read_dir(&libs_dir).map_err(|e| BuildError::io(&libs_dir, e))?;
        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BuildError::io(&libs_dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();

        for dir in dirs {
            let namespace = dir.strip_prefix(root).unwrap_or(&dir).to_path_buf();
            libs.push(LibraryRoot::from_directory(&dir, namespace)?);
        }
    }

    tracing::debug!("Found {} libraries in {}", libs.len(), root.display());
    Ok(libs)
}
