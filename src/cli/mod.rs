//! Command-line interface
//!
//! Global flags select the bucket and runtime knobs; `list` and `download`
//! share the symbol/month filter flags.

pub mod download;
pub mod error;
pub mod list;

use crate::downloader::config::{
    DEFAULT_BUCKET, DEFAULT_PREFIX, DEFAULT_REGION, DEFAULT_WORKERS, MAX_WORKERS,
};
use crate::store::{ObjectStore, StoreConfig};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

pub use download::DownloadArgs;
pub use error::CliError;
pub use list::ListArgs;

/// Trade archive downloader CLI
#[derive(Parser, Debug)]
#[command(name = "trades-archive-downloader")]
#[command(about = "List and download monthly trade archives from S3", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Bucket holding the archives
    #[arg(long, global = true, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// Key prefix the archives live under
    #[arg(long, global = true, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Bucket region
    #[arg(long, global = true, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Custom endpoint URL for S3-compatible services
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Concurrent downloads (used by `download`; `list` ignores it)
    #[arg(long, global = true, default_value_t = DEFAULT_WORKERS, value_parser = parse_workers)]
    pub workers: usize,

    /// Log level (RUST_LOG overrides)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Output format (json or human)
    #[arg(long, global = true, default_value = "human")]
    pub output_format: OutputFormat,
}

impl Cli {
    /// Store connection settings from the global flags
    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new(&self.region);
        match &self.endpoint {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        }
    }

    /// Run the selected command against `store`, writing results to `out`
    pub async fn execute<W: Write>(
        &self,
        store: Arc<dyn ObjectStore>,
        out: &mut W,
    ) -> Result<(), CliError> {
        match &self.command {
            Commands::List(args) => args.execute(self, store.as_ref(), out).await,
            Commands::Download(args) => args.execute(self, store, out).await,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List matching archive keys
    List(ListArgs),

    /// Download matching archives into a directory
    Download(DownloadArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Human,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

fn parse_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value == 0 {
        return Err("workers must be at least 1".to_string());
    }
    if value > MAX_WORKERS {
        return Err(format!("workers {value} exceeds maximum of {MAX_WORKERS}"));
    }
    Ok(value)
}
