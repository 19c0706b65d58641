use super::{LibraryBuildParams, LibraryPlan};
use crate::error::{BuildError, BuildResult};
use crate::library_root::collect_libraries;
use mason_config::Toolchain;
use mason_package::{PackageManifest, Usage};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// The libraries of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagePlan {
    pub name: String,
    pub namespace: String,
    pub libraries: Vec<LibraryPlan>,
}

impl PackagePlan {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            libraries: Vec::new(),
        }
    }

    pub fn add_library(&mut self, lib: LibraryPlan) {
        self.libraries.push(lib);
    }
}

/// Plan every library in the package at `root`. Libraries are qualified as
/// `<namespace>/<library name>`; a root library without `library.toml` takes
/// the package name.
pub fn plan_package(
    manifest: &PackageManifest,
    root: &Path,
    params: &LibraryBuildParams,
) -> BuildResult<PackagePlan> {
    let mut pkg = PackagePlan::new(&manifest.name, &manifest.namespace);
    for lib in collect_libraries(root, &manifest.name)? {
        let qual_name = format!("{}/{}", manifest.namespace, lib.manifest().name);
        pkg.add_library(LibraryPlan::create(&lib, params, Some(&qual_name)));
    }
    Ok(pkg)
}

/// What a dependent needs to know to build against a library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryOutputs {
    /// Static archive, absent for header-only libraries
    pub archive: Option<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    pub uses: Vec<Usage>,
    pub links: Vec<Usage>,
}

/// Plans for a whole build, one entry per package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub packages: Vec<PackagePlan>,
}

impl BuildPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package. Qualified library names must stay unique across the
    /// whole plan; a package repeating one is rejected and not added.
    pub fn add_package(&mut self, pkg: PackagePlan) -> BuildResult<()> {
        let mut seen: HashSet<&str> = self
            .libraries()
            .map(|lib| lib.qualified_name.as_str())
            .collect();
        for lib in &pkg.libraries {
            if !seen.insert(lib.qualified_name.as_str()) {
                return Err(BuildError::DuplicateLibrary {
                    name: lib.qualified_name.clone(),
                });
            }
        }
        self.packages.push(pkg);
        Ok(())
    }

    pub fn libraries(&self) -> impl Iterator<Item = &LibraryPlan> {
        self.packages.iter().flat_map(|pkg| pkg.libraries.iter())
    }

    pub fn find_library(&self, qualified_name: &str) -> Option<&LibraryPlan> {
        self.libraries()
            .find(|lib| lib.qualified_name == qualified_name)
    }

    /// Map of qualified library name to its build outputs
    pub fn index(&self, toolchain: &Toolchain) -> BTreeMap<String, LibraryOutputs> {
        self.libraries()
            .map(|lib| {
                let outputs = LibraryOutputs {
                    archive: lib.archive.plan().map(|a| a.archive_file_path(toolchain)),
                    include_dirs: lib.include_dirs(),
                    uses: lib.uses.clone(),
                    links: lib.links.clone(),
                };
                (lib.qualified_name.clone(), outputs)
            })
            .collect()
    }
}
