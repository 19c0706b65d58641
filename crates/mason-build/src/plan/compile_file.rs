use crate::rules::CompileFileRules;
use crate::source::SourceFile;
use mason_config::Toolchain;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix of the marker file a syntax-only check leaves behind
const SYNTAX_ONLY_SUFFIX: &str = ".stamp";

/// Compilation of one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileFilePlan {
    pub source: SourceFile,
    pub rules: CompileFileRules,
    /// Qualified name of the library the file belongs to
    pub qualifier: String,
    /// Directory the output is placed under, mirroring the source layout
    pub output_dir: PathBuf,
}

impl CompileFilePlan {
    pub fn new(
        rules: CompileFileRules,
        source: SourceFile,
        qualifier: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            rules,
            qualifier: qualifier.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Where the compiled object goes, relative to the build directory.
    ///
    /// `src/a/b.cpp` compiled into `out/obj` becomes `out/obj/a/b.cpp.o`.
    /// Syntax-only checks produce a `.stamp` file instead.
    pub fn object_file_path(&self, toolchain: &Toolchain) -> PathBuf {
        let suffix = if self.rules.syntax_only() {
            SYNTAX_ONLY_SUFFIX
        } else {
            toolchain.object_suffix.as_str()
        };
        append_suffix(&self.output_dir.join(self.source.relative_path()), suffix)
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;

    #[test]
    fn test_object_file_path() {
        let sf = SourceFile::new("/lib/src/a/b.cpp", "/lib/src", SourceKind::Source);
        let plan = CompileFilePlan::new(CompileFileRules::new(), sf, "ns/lib", "out/obj");
        assert_eq!(
            plan.object_file_path(&Toolchain::default()),
            PathBuf::from("out/obj/a/b.cpp.o")
        );
    }

    #[test]
    fn test_syntax_only_writes_stamp() {
        let sf = SourceFile::new("/lib/include/x.hpp", "/lib/include", SourceKind::PublicHeader);
        let rules = CompileFileRules::new().with_syntax_only(true);
        let plan = CompileFilePlan::new(rules, sf, "ns/lib", "out/timestamps");
        assert_eq!(
            plan.object_file_path(&Toolchain::default()),
            PathBuf::from("out/timestamps/x.hpp.stamp")
        );
    }
}
