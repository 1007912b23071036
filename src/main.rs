//! Main entry point for the trades-archive-downloader CLI

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::error;
use trades_archive_downloader::cli::Cli;
use trades_archive_downloader::logging::LoggingConfig;
use trades_archive_downloader::store::S3ObjectStore;

async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = S3ObjectStore::new(cli.store_config()).context("failed to create S3 client")?;
    let mut stdout = std::io::stdout();
    cli.execute(Arc::new(store), &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = LoggingConfig::from_env(&cli.log_level).init() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
