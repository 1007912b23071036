//! CLI error types and conversions

use crate::downloader::DownloadError;
use crate::filter::FilterError;
use crate::store::StoreError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Bad `--start`/`--end`
    #[error("{0}")]
    FilterError(#[from] FilterError),

    /// Listing or client setup failed
    #[error("storage error: {0}")]
    StoreError(#[from] StoreError),

    /// Batch setup failed
    #[error("download error: {0}")]
    DownloadError(#[from] DownloadError),

    /// Writing command output failed
    #[error("output error: {0}")]
    OutputError(#[from] std::io::Error),

    /// JSON rendering failed
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
