//! Declarative build plans
//!
//! A plan describes every compile, archive, link and template render a
//! build needs. Plans are plain values: building one never touches the
//! compiler, and they serialize to JSON for an external executor.

mod archive;
mod build_plan;
mod compile_file;
mod exe;
mod library;
mod template;

pub use archive::{Archive, ArchivePlan};
pub use build_plan::{plan_package, BuildPlan, LibraryOutputs, PackagePlan};
pub use compile_file::CompileFilePlan;
pub use exe::{ExecutableKind, LinkExecutablePlan};
pub use library::{LibraryBuildParams, LibraryPlan};
pub use template::RenderTemplatePlan;
