use super::CompileFilePlan;
use mason_config::Toolchain;
use mason_package::Usage;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutableKind {
    App,
    Test,
}

/// Compilation and link of one app or test executable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkExecutablePlan {
    /// Libraries linked into the executable
    pub links: Vec<Usage>,
    /// Compilation of the entry-point source
    pub main_compile: CompileFilePlan,
    pub out_subdir: PathBuf,
    pub name: String,
    pub kind: ExecutableKind,
}

impl LinkExecutablePlan {
    pub fn new(
        links: Vec<Usage>,
        main_compile: CompileFilePlan,
        out_subdir: impl Into<PathBuf>,
        kind: ExecutableKind,
    ) -> Self {
        let name = executable_name(&main_compile.source.path);
        Self {
            links,
            main_compile,
            out_subdir: out_subdir.into(),
            name,
            kind,
        }
    }

    pub fn is_test(&self) -> bool {
        self.kind == ExecutableKind::Test
    }

    pub fn exe_path(&self, toolchain: &Toolchain) -> PathBuf {
        self.out_subdir.join(toolchain.exe_file_name(&self.name))
    }
}

/// `foo.test.cpp` -> `foo`
fn executable_name(path: &Path) -> String {
    let stem = path.file_stem().map(Path::new).unwrap_or(path);
    stem.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
