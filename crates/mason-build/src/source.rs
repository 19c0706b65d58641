//! Source discovery and classification
use crate::error::{BuildError, BuildResult};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const HEADER_EXTS: &[&str] = &["H", "H++", "h", "h++", "hh", "hpp", "hxx", "inl"];
const HEADER_IMPL_EXTS: &[&str] = &["ipp", "tpp"];
const SOURCE_EXTS: &[&str] = &["C", "c", "c++", "cc", "cpp", "cxx"];

/// Kind of a discovered source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Compiled into the library archive
    Source,
    /// Header under `src/`, visible only to the library itself
    PrivateHeader,
    /// Header under `include/`, visible to dependents
    PublicHeader,
    /// `*.config.<header ext>` rendered into the codegen directory
    HeaderTemplate,
    /// Template implementation file (`.ipp`, `.tpp`); never compiled on its own
    HeaderImpl,
    /// `*.main.<source ext>`: entry point of an application
    App,
    /// `*.test.<source ext>`: entry point of a test executable
    Test,
}

impl SourceKind {
    pub fn is_header(&self) -> bool {
        match self {
            Self::PrivateHeader | Self::PublicHeader | Self::HeaderTemplate | Self::HeaderImpl => {
                true
            }
            Self::Source | Self::App | Self::Test => false,
        }
    }
}

/// Which conventional directory of a library a root is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootRole {
    Src,
    Include,
}

/// Classify a file by its name and the root it lives under.
///
/// Returns `None` for files that are not sources at all (READMEs, build
/// scripts, ...); those are skipped by the collector.
pub fn infer_source_kind(path: &Path, role: RootRole) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?;
    let stem = Path::new(path.file_stem()?);
    let inner_ext = stem.extension();

    if HEADER_EXTS.contains(&ext) {
        if inner_ext == Some(OsStr::new("config")) {
            return Some(SourceKind::HeaderTemplate);
        }
        return Some(match role {
            RootRole::Src => SourceKind::PrivateHeader,
            RootRole::Include => SourceKind::PublicHeader,
        });
    }

    if HEADER_IMPL_EXTS.contains(&ext) {
        return Some(SourceKind::HeaderImpl);
    }

    if !SOURCE_EXTS.contains(&ext) {
        return None;
    }

    match inner_ext.and_then(OsStr::to_str) {
        Some("test") => Some(SourceKind::Test),
        Some("main") => Some(SourceKind::App),
        _ => Some(SourceKind::Source),
    }
}

/// A classified file found under a source root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// The root directory the file was found under
    pub basis_path: PathBuf,
    pub kind: SourceKind,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, basis_path: impl Into<PathBuf>, kind: SourceKind) -> Self {
        Self {
            path: path.into(),
            basis_path: basis_path.into(),
            kind,
        }
    }

    /// Path of the file relative to its root
    pub fn relative_path(&self) -> &Path {
        self.path
            .strip_prefix(&self.basis_path)
            .unwrap_or(&self.path)
    }
}

/// A directory of sources (`src/` or `include/`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub path: PathBuf,
    pub role: RootRole,
}

impl SourceRoot {
    pub fn new(path: impl Into<PathBuf>, role: RootRole) -> Self {
        Self {
            path: path.into(),
            role,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Lazily walk the root. Each call starts a fresh scan; entries within a
    /// directory are visited in file-name order.
    pub fn iter(&self) -> impl Iterator<Item = BuildResult<SourceFile>> + '_ {
        let walker = self
            .exists()
            .then(|| WalkDir::new(&self.path).follow_links(true).sort_by_file_name());

        walker
            .into_iter()
            .flat_map(|w| w.into_iter())
            .filter_map(move |entry| match entry {
                Err(e) => Some(Err(BuildError::from(e))),
                Ok(entry) if !entry.file_type().is_file() => None,
                Ok(entry) => infer_source_kind(entry.path(), self.role)
                    .map(|kind| Ok(SourceFile::new(entry.path(), &self.path, kind))),
            })
    }

    /// Scan the root and return every source, sorted by path.
    /// A missing root has no sources.
    pub fn collect_sources(&self) -> BuildResult<Vec<SourceFile>> {
        let mut sources = self.iter().collect::<BuildResult<Vec<_>>>()?;
        sources.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(sources)
    }
}
