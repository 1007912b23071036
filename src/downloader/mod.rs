//! Download orchestration
//!
//! Turns a list of bucket keys into local files with bounded concurrency,
//! skip-if-present behavior and retry with exponential backoff.
//!
//! # Overview
//!
//! 1. **Planning**: each key becomes a [`task::DownloadTask`] with its local
//!    destination (see [`crate::output::local_path_for_key`])
//! 2. **Execution**: [`executor::DownloadExecutor`] runs tasks on a fixed pool
//!    of workers fed through a channel
//! 3. **Retry**: failed transfers back off `2^attempt` seconds through an
//!    injectable [`retry::Sleeper`]
//! 4. **Tallying**: terminal outcomes are counted into a
//!    [`progress::BatchSummary`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use trades_archive_downloader::downloader::DownloadExecutor;
//! use trades_archive_downloader::store::{S3ObjectStore, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(S3ObjectStore::new(StoreConfig::default())?);
//! let executor = DownloadExecutor::new(store, "data.binance.vision", "data/spot/monthly/trades/")
//!     .with_max_workers(4)
//!     .with_retries(3);
//!
//! let keys = vec!["data/spot/monthly/trades/BTCUSDT/BTCUSDT-trades-2024-01.zip".to_string()];
//! let summary = executor.download_all(&keys, Path::new("./archives")).await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! A key that still fails after its retry budget is logged and counted but
//! never cancels its siblings. Only setup failures before dispatch (creating
//! the target directory) are returned from
//! [`executor::DownloadExecutor::download_all`].

pub mod config;
pub mod executor;
pub mod progress;
pub mod retry;
pub mod task;

use crate::store::StoreError;
use std::path::PathBuf;

pub use executor::DownloadExecutor;
pub use progress::{BatchSummary, OutcomeCounters};
pub use retry::{Sleeper, TokioSleeper};
pub use task::{DownloadTask, TaskOutcome};

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A local directory could not be created
    #[error("failed to create directory {path:?}: {source}")]
    DirectoryError {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// Every attempt for a key failed
    #[error("download of {key} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Object key
        key: String,
        /// Attempts made
        attempts: u32,
        /// Error from the last attempt
        #[source]
        source: StoreError,
    },

    /// The retry budget was 0, so no attempt was made
    #[error("download of {key} not attempted: retry budget is 0")]
    NoAttempts {
        /// Object key
        key: String,
    },
}
