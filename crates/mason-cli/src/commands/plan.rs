//! `mason plan`: print the build plan for a package
use super::Project;
use anyhow::Result;
use mason_build::Archive;
use std::path::Path;

pub fn run(project_dir: &Path, repo: Option<&Path>, json: bool) -> Result<()> {
    let project = Project::load(project_dir)?;
    let plan = project.build_plan(repo)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let toolchain = project.config.toolchain();
    for pkg in &plan.packages {
        println!("{} ({})", pkg.name, pkg.namespace);
        for lib in &pkg.libraries {
            let archive = match &lib.archive {
                Archive::HeaderOnly => "header-only".to_string(),
                Archive::Static(a) => a.archive_file_path(&toolchain).display().to_string(),
            };
            println!("  {}: {}", lib.qualified_name, archive);
            for exe in &lib.executables {
                let label = if exe.is_test() { "test" } else { "app" };
                println!("    {} {}", label, exe.exe_path(&toolchain).display());
            }
            if !lib.header_checks.is_empty() {
                println!("    {} header checks", lib.header_checks.len());
            }
            if !lib.templates.is_empty() {
                println!("    {} templates", lib.templates.len());
            }
        }
    }
    Ok(())
}
