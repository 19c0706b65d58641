use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

/// Build planner for C and C++ packages.
///
/// EXAMPLES:
///     mason plan --repo ~/sdists          Show what would be built
///     mason index --repo ~/sdists         Write the library index
///     mason status _build/obj/a.cpp.o     Check an output against its inputs
///
/// ENVIRONMENT VARIABLES:
///     MASON_LOG          Log filter (e.g. 'debug', 'mason_build=trace')
///     MASON_OUT_DIR      Override the output directory
///     MASON_DEPS_MODE    Override the dependency listing mode (none, gnu, msvc)
#[derive(Parser)]
#[command(name = "mason")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, short = 'C', global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve dependencies and print the build plan
    Plan {
        /// Directory of source distributions (`<name>@<version>/package.toml`)
        #[arg(long, env = "MASON_REPO")]
        repo: Option<PathBuf>,
        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the library index for dependents and linkers
    Index {
        #[arg(long, env = "MASON_REPO")]
        repo: Option<PathBuf>,
        /// Index file (defaults to <out_dir>/index.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show the recorded compilation of an output and which inputs changed
    Status {
        /// Output path, as recorded
        output: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Record the inputs of a finished compilation
    ///
    /// In gnu mode LISTING is the make-rule `.d` file; in msvc mode it is the
    /// captured compiler output, which is echoed back without the include notes.
    RecordDeps {
        /// Command line the output was compiled with
        #[arg(long)]
        command: String,
        /// Compiled output (read from the listing in gnu mode if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        listing: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Plan { repo, json } => {
            commands::plan::run(&cli.project_dir, repo.as_deref(), json)?;
        }
        Commands::Index { repo, output } => {
            commands::index::run(&cli.project_dir, repo.as_deref(), output)?;
        }
        Commands::Status { output, json } => {
            commands::status::run(&cli.project_dir, &output, json)?;
        }
        Commands::RecordDeps {
            command,
            output,
            listing,
        } => {
            let args = commands::record_deps::RecordArgs {
                output,
                command,
                listing,
            };
            commands::record_deps::run(&cli.project_dir, args)?;
        }
    }

    Ok(())
}
