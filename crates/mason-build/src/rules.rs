//! Compile rules and the per-library rule variants
use crate::library_root::LibraryRoot;
use mason_package::Usage;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Flags and paths a single compilation is run with
///
/// A value type: every `with_*` method returns a new set of rules and leaves
/// any clones untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileFileRules {
    include_dirs: Vec<PathBuf>,
    defines: Vec<String>,
    uses: Vec<Usage>,
    enable_warnings: bool,
    syntax_only: bool,
}

impl CompileFileRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an include directory. Directories already present are skipped.
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if !self.include_dirs.contains(&dir) {
            self.include_dirs.push(dir);
        }
        self
    }

    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    /// Append usage requirements, keeping the first occurrence of each
    pub fn with_uses<'a>(mut self, uses: impl IntoIterator<Item = &'a Usage>) -> Self {
        for usage in uses {
            if !self.uses.contains(usage) {
                self.uses.push(usage.clone());
            }
        }
        self
    }

    pub fn with_warnings(mut self, enable: bool) -> Self {
        self.enable_warnings = enable;
        self
    }

    pub fn with_syntax_only(mut self, syntax_only: bool) -> Self {
        self.syntax_only = syntax_only;
        self
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    pub fn uses(&self) -> &[Usage] {
        &self.uses
    }

    pub fn enable_warnings(&self) -> bool {
        self.enable_warnings
    }

    pub fn syntax_only(&self) -> bool {
        self.syntax_only
    }
}

/// The four rule variants a library is planned with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRuleSet {
    /// Library sources: public and private include dirs
    pub base: CompileFileRules,
    /// Standalone check of an `include/` header: public include dir only
    pub public_header: CompileFileRules,
    /// Standalone check of a `src/` header: public and private include dirs
    pub private_header: CompileFileRules,
    /// Test executables: base plus test-only usage requirements
    pub test: CompileFileRules,
}

impl LibraryRuleSet {
    /// Derive the rule variants for `lib`. `codegen_dir` is added to every
    /// variant's include path when the library renders header templates.
    pub fn assemble(
        lib: &LibraryRoot,
        enable_warnings: bool,
        codegen_dir: Option<&Path>,
        test_uses: &[Usage],
    ) -> Self {
        let mut public = lib
            .public_compile_rules()
            .with_warnings(enable_warnings)
            .with_uses(&lib.manifest().uses);
        if let Some(dir) = codegen_dir {
            public = public.with_include_dir(dir);
        }

        let public_header = public.clone().with_syntax_only(true);
        let private_header = public_header
            .clone()
            .with_include_dir(lib.private_include_dir());
        let base = public.with_include_dir(lib.private_include_dir());
        let test = base.clone().with_uses(test_uses);

        Self {
            base,
            public_header,
            private_header,
            test,
        }
    }
}
