//! Jobs command - list available jobs.

use anyhow::Result;
use serde_json::json;
use veleta_providers::JobRegistry;

use crate::{Cli, OutputFormat};

/// Runs the jobs command.
pub fn run(cli: &Cli) -> Result<()> {
    let descriptors = JobRegistry::all();

    match cli.format {
        OutputFormat::Text => {
            for desc in descriptors {
                println!(
                    "{:<14} {}  [{}]",
                    desc.kind.cli_name(),
                    desc.summary,
                    desc.kind.display_name()
                );
            }
        }
        OutputFormat::Json => {
            let listing: Vec<serde_json::Value> = descriptors
                .iter()
                .map(|d| {
                    json!({
                        "name": d.kind.cli_name(),
                        "summary": d.summary,
                        "per_unit": d.per_unit,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string(&listing)?);
        }
    }

    Ok(())
}
