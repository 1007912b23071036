//! `list` command: print the archive keys that match the filters

use super::{Cli, CliError, OutputFormat};
use crate::filter::build_key_filter;
use crate::listing::list_files;
use crate::store::ObjectStore;
use clap::Args;
use std::io::Write;

/// List command arguments
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Symbols to keep (repeatable or comma-separated; case-insensitive)
    #[arg(long = "symbol", short = 's', value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// First month to include (YYYY-MM)
    #[arg(long)]
    pub start: Option<String>,

    /// Last month to include (YYYY-MM)
    #[arg(long)]
    pub end: Option<String>,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute<W: Write>(
        &self,
        cli: &Cli,
        store: &dyn ObjectStore,
        out: &mut W,
    ) -> Result<(), CliError> {
        let filter = build_key_filter(&self.symbols, self.start.as_deref(), self.end.as_deref())?;
        let keys = list_files(store, &cli.bucket, &cli.prefix, &filter).await?;

        match cli.output_format {
            OutputFormat::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(&keys)?)?;
            }
            OutputFormat::Human => {
                for key in &keys {
                    writeln!(out, "{key}")?;
                }
                writeln!(out, "Total: {}", keys.len())?;
            }
        }
        Ok(())
    }
}
