use super::{
    Archive, ArchivePlan, CompileFilePlan, ExecutableKind, LinkExecutablePlan, RenderTemplatePlan,
};
use crate::library_root::LibraryRoot;
use crate::rules::LibraryRuleSet;
use crate::source::SourceKind;
use mason_package::Usage;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Prefix of the directory header templates are rendered into
const CODEGEN_DIR: &str = "__mason/gen";

/// Knobs for planning one library
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryBuildParams {
    /// Subdirectory of the build directory this library's package lives in
    pub out_subdir: PathBuf,
    pub build_tests: bool,
    pub build_apps: bool,
    pub enable_warnings: bool,
    /// Extra usage requirements for test executables only
    pub test_uses: Vec<Usage>,
}

/// Everything needed to build one library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryPlan {
    pub name: String,
    pub qualified_name: String,
    pub output_dir: PathBuf,
    pub archive: Archive,
    pub executables: Vec<LinkExecutablePlan>,
    pub templates: Vec<RenderTemplatePlan>,
    /// Syntax-only checks that each header compiles on its own
    pub header_checks: Vec<CompileFilePlan>,
    pub public_include_dir: PathBuf,
    pub uses: Vec<Usage>,
    pub links: Vec<Usage>,
}

impl LibraryPlan {
    /// Plan a library. `qual_name` defaults to the manifest name.
    ///
    /// Layout problems (a source file under `include/`) are logged and the
    /// offending file is left out.
    pub fn create(lib: &LibraryRoot, params: &LibraryBuildParams, qual_name: Option<&str>) -> Self {
        // Joining an empty namespace would leave a trailing separator
        let out_dir = match lib.path_namespace() {
            ns if ns.as_os_str().is_empty() => params.out_subdir.clone(),
            ns => params.out_subdir.join(ns),
        };
        let qual_name = qual_name.unwrap_or(&lib.manifest().name).to_string();

        let src_root = lib.src_source_root().path;
        let include_root = lib.include_source_root().path;

        let mut apps = Vec::new();
        let mut tests = Vec::new();
        let mut lib_sources = Vec::new();
        let mut template_sources = Vec::new();
        let mut private_headers = Vec::new();
        let mut public_headers = Vec::new();

        for sf in lib.all_sources() {
            if sf.basis_path == src_root {
                match sf.kind {
                    SourceKind::Test => tests.push(sf),
                    SourceKind::App => apps.push(sf),
                    SourceKind::Source => lib_sources.push(sf),
                    SourceKind::HeaderTemplate => template_sources.push(sf),
                    SourceKind::PrivateHeader | SourceKind::PublicHeader => {
                        private_headers.push(sf)
                    }
                    SourceKind::HeaderImpl => {}
                }
            } else if sf.basis_path == include_root {
                match sf.kind {
                    kind if !kind.is_header() => {
                        tracing::warn!(
                            "Public include/ should only contain header or header template files. Not a header: {}",
                            sf.path.display()
                        );
                    }
                    SourceKind::PublicHeader | SourceKind::PrivateHeader => {
                        public_headers.push(sf)
                    }
                    _ => {}
                }
            }
        }

        if !params.build_tests {
            private_headers.clear();
            public_headers.clear();
        }

        let codegen_dir = Path::new(CODEGEN_DIR).join(&out_dir);
        let rules = LibraryRuleSet::assemble(
            lib,
            params.enable_warnings,
            (!template_sources.is_empty()).then_some(codegen_dir.as_path()),
            &params.test_uses,
        );

        let obj_dir = out_dir.join("obj");
        let stamp_dir = out_dir.join("timestamps");

        let lib_compiles: Vec<_> = lib_sources
            .into_iter()
            .map(|sf| CompileFilePlan::new(rules.base.clone(), sf.clone(), &qual_name, &obj_dir))
            .collect();

        let header_checks = private_headers
            .into_iter()
            .map(|sf| (sf, &rules.private_header))
            .chain(public_headers.into_iter().map(|sf| (sf, &rules.public_header)))
            .map(|(sf, r)| CompileFilePlan::new(r.clone(), sf.clone(), &qual_name, &stamp_dir))
            .collect();

        let archive = if lib_compiles.is_empty() {
            tracing::debug!(
                "Library {} has no compiled inputs, so no archive will be generated",
                qual_name
            );
            Archive::HeaderOnly
        } else {
            tracing::debug!("Generating an archive library for {}", qual_name);
            Archive::Static(ArchivePlan::new(
                &lib.manifest().name,
                &qual_name,
                &out_dir,
                lib_compiles,
            ))
        };

        let mut links: Vec<Usage> = Vec::new();
        extend_unique(&mut links, &lib.manifest().uses);
        extend_unique(&mut links, &lib.manifest().links);
        let mut test_links = links.clone();
        extend_unique(&mut test_links, &params.test_uses);

        let mut executables = Vec::new();
        for sf in apps.into_iter().chain(tests) {
            let kind = match sf.kind {
                SourceKind::Test if params.build_tests => ExecutableKind::Test,
                SourceKind::App if params.build_apps => ExecutableKind::App,
                _ => continue,
            };
            let (subdir_base, exe_rules, exe_links) = match kind {
                ExecutableKind::Test => (out_dir.join("test"), &rules.test, &test_links),
                ExecutableKind::App => (out_dir.clone(), &rules.base, &links),
            };
            let subdir = match sf.relative_path().parent() {
                Some(parent) if !parent.as_os_str().is_empty() => subdir_base.join(parent),
                _ => subdir_base,
            };
            let main_compile =
                CompileFilePlan::new(exe_rules.clone(), sf.clone(), &qual_name, &obj_dir);
            executables.push(LinkExecutablePlan::new(
                exe_links.clone(),
                main_compile,
                subdir,
                kind,
            ));
        }

        let templates = template_sources
            .into_iter()
            .map(|sf| RenderTemplatePlan::new(sf.clone(), &codegen_dir))
            .collect();

        Self {
            name: lib.manifest().name.clone(),
            qualified_name: qual_name,
            output_dir: out_dir,
            archive,
            executables,
            templates,
            header_checks,
            public_include_dir: lib.public_include_dir(),
            uses: lib.manifest().uses.clone(),
            links,
        }
    }

    /// Directory rendered headers land in, if the library has templates.
    /// Dependents add it to their include path.
    pub fn generated_include_dir(&self) -> Option<PathBuf> {
        if self.templates.is_empty() {
            return None;
        }
        Some(Path::new(CODEGEN_DIR).join(&self.output_dir))
    }

    /// Include directories a dependent compiles against
    pub fn include_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.public_include_dir.clone()];
        dirs.extend(self.generated_include_dir());
        dirs
    }

    pub fn executables_of(&self, kind: ExecutableKind) -> impl Iterator<Item = &LinkExecutablePlan> {
        self.executables.iter().filter(move |e| e.kind == kind)
    }
}

fn extend_unique(into: &mut Vec<Usage>, from: &[Usage]) {
    for usage in from {
        if !into.contains(usage) {
            into.push(usage.clone());
        }
    }
}

