//! `mason index`: write the library index
use super::Project;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default index file name, under the output directory
pub const INDEX_FILE: &str = "index.json";

pub fn run(project_dir: &Path, repo: Option<&Path>, output: Option<PathBuf>) -> Result<()> {
    let project = Project::load(project_dir)?;
    let plan = project.build_plan(repo)?;
    let path = output.unwrap_or_else(|| project.out_path(INDEX_FILE));

    mason_build::write_index(&path, &plan, &project.config.toolchain())
        .with_context(|| format!("Failed to write index {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}
