//! `download` command: fetch matching archives into a directory tree

use super::{Cli, CliError, OutputFormat};
use crate::downloader::config::{DEFAULT_RETRIES, DEFAULT_START_MONTH, MAX_RETRIES};
use crate::downloader::progress::batch_progress_bar;
use crate::downloader::DownloadExecutor;
use crate::filter::build_key_filter;
use crate::listing::list_files;
use crate::store::ObjectStore;
use clap::Args;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Download command arguments
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Directory the archives are written under
    pub target_dir: PathBuf,

    /// Symbols to keep (repeatable or comma-separated; case-insensitive)
    #[arg(long = "symbol", short = 's', value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// First month to include (YYYY-MM)
    #[arg(long, default_value = DEFAULT_START_MONTH)]
    pub start: String,

    /// Last month to include (YYYY-MM)
    #[arg(long)]
    pub end: Option<String>,

    /// Replace files that already exist
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Show what would be downloaded without fetching anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Attempts per file (1-10)
    #[arg(long, default_value_t = DEFAULT_RETRIES, value_parser = clap::value_parser!(u32).range(1..=MAX_RETRIES as i64))]
    pub retries: u32,
}

impl DownloadArgs {
    /// Execute the download command
    pub async fn execute<W: Write>(
        &self,
        cli: &Cli,
        store: Arc<dyn ObjectStore>,
        out: &mut W,
    ) -> Result<(), CliError> {
        let filter = build_key_filter(&self.symbols, Some(self.start.as_str()), self.end.as_deref())?;
        let keys = list_files(store.as_ref(), &cli.bucket, &cli.prefix, &filter).await?;
        let human = cli.output_format == OutputFormat::Human;

        if human {
            writeln!(out, "Found {} files to process.", keys.len())?;
            writeln!(out, "Using {} worker threads.", cli.workers)?;
        }

        let executor = DownloadExecutor::new(store, &cli.bucket, &cli.prefix)
            .with_retries(self.retries)
            .with_max_workers(cli.workers)
            .with_overwrite(self.overwrite);

        if self.dry_run {
            let plan: Vec<_> = keys
                .iter()
                .map(|key| executor.task_for(key, &self.target_dir))
                .collect();

            if human {
                for task in &plan {
                    writeln!(
                        out,
                        "[dry-run] Would download: {} -> {}",
                        task.key,
                        task.destination.display()
                    )?;
                }
            } else {
                let output = json!({
                    "dry_run": true,
                    "files": plan.len(),
                    "tasks": plan,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            }
            return Ok(());
        }

        let executor = if human && !keys.is_empty() {
            executor.with_progress(batch_progress_bar(keys.len()))
        } else {
            executor
        };

        let summary = executor.download_all(&keys, &self.target_dir).await?;
        if !summary.is_success() {
            warn!(failed = summary.failed, "Some files could not be downloaded");
        }

        match cli.output_format {
            OutputFormat::Human => {
                writeln!(out, "Download complete: {summary}")?;
                writeln!(out, "Output: {}", self.target_dir.display())?;
            }
            OutputFormat::Json => {
                let output = json!({
                    "dry_run": false,
                    "files": keys.len(),
                    "workers": executor.max_workers(),
                    "target_dir": self.target_dir,
                    "summary": summary,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            }
        }
        Ok(())
    }
}
