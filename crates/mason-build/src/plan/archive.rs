use super::CompileFilePlan;
use mason_config::Toolchain;
use serde::Serialize;
use std::path::PathBuf;

/// Creation of a static archive from a library's compiled sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivePlan {
    /// Library name, used for the archive file name
    pub name: String,
    pub qualified_name: String,
    pub output_dir: PathBuf,
    pub compile_files: Vec<CompileFilePlan>,
}

impl ArchivePlan {
    pub fn new(
        name: impl Into<String>,
        qualified_name: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        compile_files: Vec<CompileFilePlan>,
    ) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            output_dir: output_dir.into(),
            compile_files,
        }
    }

    pub fn archive_file_path(&self, toolchain: &Toolchain) -> PathBuf {
        self.output_dir
            .join(toolchain.archive_file_name(&self.name))
    }

    /// Object files that go into the archive, in compile order
    pub fn object_files(&self, toolchain: &Toolchain) -> Vec<PathBuf> {
        self.compile_files
            .iter()
            .map(|cf| cf.object_file_path(toolchain))
            .collect()
    }
}

/// Whether a library produces an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Archive {
    /// No compiled sources: the library is headers only
    HeaderOnly,
    Static(ArchivePlan),
}

impl Archive {
    pub fn plan(&self) -> Option<&ArchivePlan> {
        match self {
            Self::HeaderOnly => None,
            Self::Static(plan) => Some(plan),
        }
    }

    pub fn is_header_only(&self) -> bool {
        matches!(self, Self::HeaderOnly)
    }
}
