//! `mason record-deps`: store what a finished compilation read
use super::load_config;
use anyhow::{bail, Context, Result};
use mason_build::{
    parse_mkfile_deps_file, parse_msvc_output_for_deps, update_deps_info, Database, DepsStore,
};
use mason_config::DepsMode;
use std::path::{Path, PathBuf};

pub struct RecordArgs {
    /// Compiled output; taken from the listing when omitted in GNU mode
    pub output: Option<PathBuf>,
    pub command: String,
    /// `.d` file (GNU) or captured compiler output (MSVC)
    pub listing: Option<PathBuf>,
}

pub fn run(project_dir: &Path, args: RecordArgs) -> Result<()> {
    let config = load_config(project_dir)?;
    let toolchain = config.toolchain();

    // `None` when the compiler told us nothing usable about its inputs
    let listed = match (toolchain.deps_mode, &args.listing) {
        (DepsMode::None, _) | (_, None) => None,
        (DepsMode::Gnu, Some(listing)) => {
            let info = parse_mkfile_deps_file(listing)?;
            let malformed = info.output.as_os_str().is_empty() && info.inputs.is_empty();
            (!malformed).then_some(info)
        }
        (DepsMode::Msvc, Some(listing)) => {
            let text = std::fs::read_to_string(listing)
                .with_context(|| format!("Failed to read {}", listing.display()))?;
            let msvc = parse_msvc_output_for_deps(&text, &toolchain.msvc_deps_leader);
            if !msvc.cleaned_output.is_empty() {
                println!("{}", msvc.cleaned_output);
            }
            Some(msvc.deps_info)
        }
    };

    let output = args
        .output
        .or_else(|| listed.as_ref().map(|info| info.output.clone()))
        .filter(|output| !output.as_os_str().is_empty());
    let Some(output) = output else {
        bail!("No output path given and none found in the dependency listing");
    };

    let root = config.project_root().unwrap_or(project_dir);
    let db_path = root.join(config.db_path());
    let mut db = Database::open(&db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;

    let Some(mut info) = listed else {
        // An empty input set would read as up to date forever
        tracing::warn!(
            "No usable dependency listing for {}; it will be rebuilt next time",
            output.display()
        );
        db.transaction(|db| db.forget_compilation(&output))
            .with_context(|| format!("Failed to forget {}", output.display()))?;
        return Ok(());
    };

    info.output = output;
    info.command = args.command;
    update_deps_info(&mut db, &info)
        .with_context(|| format!("Failed to record deps of {}", info.output.display()))?;
    Ok(())
}
