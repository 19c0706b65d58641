//! Build plans for resolved dependencies, and the index handed to dependents
use crate::error::{BuildError, BuildResult};
use crate::plan::{plan_package, BuildPlan, LibraryBuildParams, LibraryOutputs};
use mason_config::Toolchain;
use mason_package::Sdist;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the build root dependencies are built into
pub const DEPS_SUBDIR: &str = "_deps";

/// Plan every library of every sdist.
///
/// Each sdist is built under `_deps/<name>@<version>`. Tests and apps of
/// dependencies are never built, and warnings stay off.
pub fn create_deps_build_plan(sdists: &[Sdist]) -> BuildResult<BuildPlan> {
    let mut plan = BuildPlan::new();
    for sdist in sdists {
        let params = LibraryBuildParams {
            out_subdir: PathBuf::from(DEPS_SUBDIR).join(sdist.id().to_string()),
            build_tests: false,
            build_apps: false,
            enable_warnings: false,
            test_uses: Vec::new(),
        };
        tracing::debug!("Planning dependency {}", sdist.id());
        let pkg = plan_package(&sdist.manifest, &sdist.path, &params)?;
        plan.add_package(pkg)?;
    }
    Ok(plan)
}

#[derive(Serialize)]
struct Index {
    libraries: BTreeMap<String, LibraryOutputs>,
}

/// Write the library index of `plan` as JSON to `path`
pub fn write_index(path: &Path, plan: &BuildPlan, toolchain: &Toolchain) -> BuildResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    let index = Index {
        libraries: plan.index(toolchain),
    };
    let json = serde_json::to_string_pretty(&index)?;
    fs::write(path, json).map_err(|e| BuildError::io(path, e))?;
    tracing::debug!(
        "Wrote index of {} libraries to {}",
        index.libraries.len(),
        path.display()
    );
    Ok(())
}
