//! Split command - batch ids for the external fan-out orchestrator.
//!
//! Reads ids from a file or stdin (newline-separated, or a JSON array)
//! and prints a JSON list of batches. The output is the orchestrator's
//! fan-out input, so it is always JSON regardless of `--format`.

use anyhow::{Context as _, Result, bail};
use clap::Args;
use std::io::Read as _;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use veleta_core::split_batches;

use crate::Cli;

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Ids per batch.
    #[arg(long, env = "VELETA_BATCH_SIZE", default_value = "500")]
    pub batch_size: NonZeroUsize,

    /// File of ids; stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// Runs the split command.
pub fn run(args: &SplitArgs, _cli: &Cli) -> Result<()> {
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read stdin")?;
            buffer
        }
    };

    let ids = parse_ids(&raw)?;
    let batches = split_batches(&ids, args.batch_size);
    println!("{}", serde_json::to_string(&batches)?);
    Ok(())
}

/// Parses ids from raw input: a JSON array of strings or numbers, or
/// whitespace-separated tokens.
fn parse_ids(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(trimmed).context("input is not a JSON array")?;
        return values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => Ok(s),
                serde_json::Value::Number(n) => Ok(n.to_string()),
                other => bail!("unsupported id: {other}"),
            })
            .collect();
    }

    Ok(trimmed
        .split_whitespace()
        .map(ToString::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_from_lines() {
        let ids = parse_ids("100\n101\n102\n").unwrap();
        assert_eq!(ids, vec!["100", "101", "102"]);
    }

    #[test]
    fn test_parse_ids_from_json_array() {
        let ids = parse_ids(r#"["100", 101]"#).unwrap();
        assert_eq!(ids, vec!["100", "101"]);

        assert!(parse_ids(r#"[{"id": 1}]"#).is_err());
    }

    #[test]
    fn test_empty_input_yields_no_batches() {
        let ids = parse_ids("").unwrap();
        assert!(ids.is_empty());
        let batches = split_batches(&ids, NonZeroUsize::new(500).unwrap());
        assert!(batches.is_empty());
    }
}
