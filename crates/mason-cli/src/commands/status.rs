//! `mason status`: what the deps database knows about an output
use super::load_config;
use anyhow::{Context, Result};
use mason_build::{get_prior_compilation, Database};
use std::path::Path;

pub fn run(project_dir: &Path, output: &Path, json: bool) -> Result<()> {
    let config = load_config(project_dir)?;
    let root = config.project_root().unwrap_or(project_dir);
    let db_path = root.join(config.db_path());
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;

    let prior = get_prior_compilation(&db, output)?;

    if json {
        let value = match &prior {
            None => serde_json::json!({ "output": output, "built": false }),
            Some(prior) => serde_json::json!({
                "output": output,
                "built": true,
                "command": prior.previous_command,
                "changed": prior.newer_inputs,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match prior {
        None => println!("{}: never built", output.display()),
        Some(prior) if prior.newer_inputs.is_empty() => {
            println!("{}: inputs unchanged", output.display());
            println!("  command: {}", prior.previous_command);
        }
        Some(prior) => {
            println!("{}: {} changed inputs", output.display(), prior.newer_inputs.len());
            println!("  command: {}", prior.previous_command);
            for input in &prior.newer_inputs {
                println!("  {}", input.display());
            }
        }
    }
    Ok(())
}
