//! Mason build planning
//!
//! Turns library directory trees and resolved dependencies into declarative
//! build plans, and tracks what each compiled output was built from:
//! - Source collection and classification
//! - Compile rule assembly (public/private/test/header-check variants)
//! - Per-library plans (compiles, archive, executables, codegen)
//! - Aggregate build plans over a resolved dependency set
//! - Dependency database and dependency-listing parsers for incremental builds
//!
//! Nothing here runs a compiler. Plans are values; an executor elsewhere
//! runs them and reports back through [`file_deps::update_deps_info`].

pub mod db;
pub mod deps;
pub mod error;
pub mod file_deps;
pub mod library_root;
pub mod plan;
pub mod rules;
pub mod source;

// Re-export main types
pub use db::{Database, DbError, DbResult, DepsStore, InputFileInfo, MemoryDepsStore};
pub use deps::{create_deps_build_plan, write_index};
pub use error::{BuildError, BuildResult};
pub use file_deps::{
    get_prior_compilation, parse_mkfile_deps_file, parse_mkfile_deps_str,
    parse_msvc_output_for_deps, update_deps_info, FileDepsInfo, MsvcDepsInfo, PriorCompilation,
};
pub use library_root::{collect_libraries, LibraryRoot};
pub use plan::{
    plan_package, Archive, ArchivePlan, BuildPlan, CompileFilePlan, ExecutableKind,
    LibraryBuildParams, LibraryOutputs, LibraryPlan, LinkExecutablePlan, PackagePlan,
    RenderTemplatePlan,
};
pub use rules::{CompileFileRules, LibraryRuleSet};
pub use source::{infer_source_kind, RootRole, SourceFile, SourceKind, SourceRoot};

// Re-export collaborator types for convenience
pub use mason_config::Toolchain;
pub use mason_package::{LibraryManifest, Usage};
