use crate::source::SourceFile;
use serde::Serialize;
use std::path::PathBuf;

/// Rendering of a `*.config.*` header template into the codegen directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderTemplatePlan {
    pub source: SourceFile,
    pub output_dir: PathBuf,
}

impl RenderTemplatePlan {
    pub fn new(source: SourceFile, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
        }
    }

    /// `src/foo/version.config.hpp` renders to `<output_dir>/foo/version.hpp`
    pub fn output_file_path(&self) -> PathBuf {
        let rel = self.source.relative_path();
        let mut name = rel
            .file_stem()
            .map(PathBuf::from)
            .unwrap_or_default()
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        if let Some(ext) = rel.extension() {
            name.push(".");
            name.push(ext);
        }
        let parent = rel.parent().map(PathBuf::from).unwrap_or_default();
        self.output_dir.join(parent).join(name)
    }
}
