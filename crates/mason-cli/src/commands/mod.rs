pub mod index;
pub mod plan;
pub mod record_deps;
pub mod status;

use anyhow::{Context, Result};
use mason_build::{create_deps_build_plan, plan_package, BuildPlan, LibraryBuildParams};
use mason_config::{Config, ConfigLoader};
use mason_package::manifest::PACKAGE_MANIFEST_FILE;
use mason_package::{find_all_dependencies, LocalRepository, PackageManifest};
use std::path::{Path, PathBuf};

/// A loaded project: its configuration and package manifest
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub manifest: PackageManifest,
}

impl Project {
    /// Load the project containing `dir`. The project root is the directory
    /// holding `mason.toml`, or `dir` itself when there is none.
    pub fn load(dir: &Path) -> Result<Self> {
        let config = load_config(dir)?;
        let root = config
            .project_root()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.to_path_buf());
        let manifest_path = root.join(PACKAGE_MANIFEST_FILE);
        let manifest = PackageManifest::from_file(&manifest_path)
            .with_context(|| format!("Failed to load {}", manifest_path.display()))?;
        Ok(Self {
            root,
            config,
            manifest,
        })
    }

    /// Resolve the package's dependencies against `repo_dir` and plan them,
    /// followed by the package itself
    pub fn build_plan(&self, repo_dir: Option<&Path>) -> Result<BuildPlan> {
        let repo = match repo_dir {
            Some(dir) => LocalRepository::from_directory(dir)
                .with_context(|| format!("Failed to load repository {}", dir.display()))?,
            None => LocalRepository::new(),
        };

        let sdists = find_all_dependencies(&repo, &self.manifest.depends)
            .context("Dependency resolution failed")?;
        tracing::debug!("Resolved {} dependencies", sdists.len());

        let mut plan = create_deps_build_plan(&sdists)?;
        let params = LibraryBuildParams {
            out_subdir: PathBuf::new(),
            build_tests: self.config.build_tests(),
            build_apps: self.config.build_apps(),
            enable_warnings: self.config.enable_warnings(),
            test_uses: Vec::new(),
        };
        let own = plan_package(&self.manifest, &self.root, &params)
            .with_context(|| format!("Failed to plan package '{}'", self.manifest.name))?;
        plan.add_package(own)?;
        Ok(plan)
    }

    /// A path relative to the output directory
    pub fn out_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(self.config.out_dir()).join(rel)
    }
}

pub fn load_config(dir: &Path) -> Result<Config> {
    ConfigLoader::new()
        .load_from_directory(dir)
        .context("Failed to load configuration")
}
