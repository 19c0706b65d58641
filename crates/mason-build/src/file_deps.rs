//! Dependency listings emitted by compilers, and the staleness check built on them
//!
//! GNU-style compilers write a make rule (`out.o: a.cpp b.h`) to a side
//! file. MSVC instead prints one `Note: including file:` line per header
//! into its normal output. Both are reduced to a [`FileDepsInfo`] and stored
//! through a [`DepsStore`].

use crate::db::DepsStore;
use crate::error::{BuildError, BuildResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What one compilation read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDepsInfo {
    pub output: PathBuf,
    pub command: String,
    pub inputs: Vec<PathBuf>,
}

/// Dependencies scraped from MSVC output, plus the output with those lines removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MsvcDepsInfo {
    /// Only `inputs` is filled; the caller supplies output and command
    pub deps_info: FileDepsInfo,
    pub cleaned_output: String,
}

/// What an output was last built with, and which of its inputs changed since
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorCompilation {
    pub previous_command: String,
    /// Inputs that are missing or whose mtime differs from the recorded one
    pub newer_inputs: Vec<PathBuf>,
}

/// Read and parse a make-rule dependency file
pub fn parse_mkfile_deps_file(path: &Path) -> BuildResult<FileDepsInfo> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    Ok(parse_mkfile_deps_str(&content))
}

/// Parse a make rule of the form `<output>: <input> <input> ...`.
///
/// A malformed listing is logged and yields an empty result, which makes the
/// next build treat the output as never built.
pub fn parse_mkfile_deps_str(content: &str) -> FileDepsInfo {
    let joined = content.replace("\\\r\n", " ").replace("\\\n", " ");
    let tokens = shlex::split(&joined).unwrap_or_default();

    let mut tokens = tokens.into_iter();
    let Some(head) = tokens.next() else {
        tracing::error!(
            "Invalid deps listing. Shell split was empty. This is almost certainly a bug."
        );
        return FileDepsInfo::default();
    };

    let Some(output) = head.strip_suffix(':') else {
        tracing::error!(
            "Invalid deps listing. Leader item '{}' is not colon-terminated. This is probably a bug. \
             (Set deps_mode = \"none\" in the toolchain config if the compiler emits another format.)",
            head
        );
        return FileDepsInfo::default();
    };

    FileDepsInfo {
        output: PathBuf::from(output),
        command: String::new(),
        inputs: tokens.map(PathBuf::from).collect(),
    }
}

fn weakly_canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Pull `leader`-prefixed include notes out of MSVC output
pub fn parse_msvc_output_for_deps(output: &str, leader: &str) -> MsvcDepsInfo {
    let mut cleaned_output = String::new();
    let mut deps_info = FileDepsInfo::default();

    for line in output.split('\n') {
        match line.trim().strip_prefix(leader) {
            Some(rest) => deps_info.inputs.push(weakly_canonical(Path::new(rest.trim()))),
            None => {
                cleaned_output.push_str(line);
                cleaned_output.push('\n');
            }
        }
    }
    cleaned_output.pop();

    MsvcDepsInfo {
        deps_info,
        cleaned_output,
    }
}

fn mtime_of(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

/// Record a finished compilation, replacing whatever was recorded before.
///
/// Call only after the compilation succeeded. Every input is stat-ed before
/// the store is touched; the writes happen in one transaction.
pub fn update_deps_info<S: DepsStore>(store: &mut S, deps: &FileDepsInfo) -> BuildResult<()> {
    let inputs = deps
        .inputs
        .iter()
        .map(|input| {
            mtime_of(input)
                .map(|mtime| (input.as_path(), mtime))
                .map_err(|e| BuildError::io(input, e))
        })
        .collect::<BuildResult<Vec<_>>>()?;

    store.transaction(|db| {
        db.record_compilation(&deps.output, &deps.command)?;
        db.forget_inputs_of(&deps.output)?;
        for (input, mtime) in &inputs {
            db.record_dep(input, &deps.output, *mtime)?;
        }
        Ok(())
    })?;

    tracing::debug!(
        "Recorded {} inputs for {}",
        inputs.len(),
        deps.output.display()
    );
    Ok(())
}

/// Look up the previous compilation of `output`.
///
/// `None` means the output was never built. Comparing the previous command
/// with the one about to run is up to the caller.
pub fn get_prior_compilation<S: DepsStore + ?Sized>(
    store: &S,
    output: &Path,
) -> BuildResult<Option<PriorCompilation>> {
    let Some(previous_command) = store.command_of(output)? else {
        return Ok(None);
    };

    let newer_inputs = store
        .inputs_of(output)?
        .into_iter()
        .filter(|input| match mtime_of(&input.path) {
            Ok(mtime) => mtime != input.last_mtime,
            Err(_) => true,
        })
        .map(|input| input.path)
        .collect();

    Ok(Some(PriorCompilation {
        previous_command,
        newer_inputs,
    }))
}
