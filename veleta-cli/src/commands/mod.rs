//! CLI command implementations.

pub mod demand;
pub mod health;
pub mod jobs;
pub mod measurements;
pub mod sensors;
pub mod split;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use std::sync::Arc;
use veleta_core::JobReport;
use veleta_fetch::{ApiClient, EnvSecretStore, FileSecretStore, RetryPolicy, SecretStore};
use veleta_store::StagingWriter;

use crate::{Cli, OutputFormat};

// ============================================================================
// Shared Arguments
// ============================================================================

/// Storage and credential flags shared by every ingestion command.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Staging bucket.
    #[arg(long, env = "VELETA_BUCKET")]
    pub bucket: Option<String>,

    /// Bucket region.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Local staging directory; takes precedence over the bucket.
    #[arg(long, env = "VELETA_STAGING_DIR")]
    pub staging_dir: Option<String>,

    /// Directory of per-secret JSON files. Without it, secrets are read
    /// from `VELETA_SECRET_*` environment variables.
    #[arg(long, env = "VELETA_SECRETS_DIR")]
    pub secrets_dir: Option<String>,
}

impl CommonArgs {
    /// Builds the staging writer from the storage flags.
    pub fn writer(&self) -> Result<StagingWriter> {
        if let Some(dir) = &self.staging_dir {
            return StagingWriter::fs(dir)
                .with_context(|| format!("cannot stage into directory {dir}"));
        }
        let Some(bucket) = self.bucket.as_deref() else {
            bail!("either --bucket or --staging-dir is required");
        };
        StagingWriter::s3(bucket, &self.region)
            .with_context(|| format!("cannot stage into bucket {bucket}"))
    }

    /// Builds the secret store from the credential flags.
    pub fn secrets(&self) -> Arc<dyn SecretStore> {
        match &self.secrets_dir {
            Some(dir) => Arc::new(FileSecretStore::new(dir)),
            None => Arc::new(EnvSecretStore::new()),
        }
    }

    /// Label for the staging destination, used in job configuration.
    pub fn destination(&self) -> String {
        self.staging_dir
            .clone()
            .or_else(|| self.bucket.clone())
            .unwrap_or_default()
    }
}

/// Builds the shared retry client.
pub fn api_client() -> Result<ApiClient> {
    Ok(ApiClient::new(RetryPolicy::default())?)
}

/// Prints a job report in the selected format.
pub fn print_report(report: &JobReport, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(report)?),
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{} ({} rows)", report.message, report.rows);
            }
        }
    }
    Ok(())
}
