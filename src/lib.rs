//! # Trades Archive Downloader Library
//!
//! Lists and downloads monthly trade archives published in a public S3 bucket,
//! such as the Binance spot dumps at `data.binance.vision`.
//!
//! ## Features
//!
//! - **Key parsing**: recognizes `<SYMBOL>/<SYMBOL>-trades-<YYYY>-<MM>.zip`
//! - **Filtering**: by symbol set and inclusive month range
//! - **Tolerant listing**: malformed listing entries are skipped, not fatal
//! - **Bounded downloads**: fixed worker pool, skip-if-present, retry with
//!   exponential backoff
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use trades_archive_downloader::downloader::DownloadExecutor;
//! use trades_archive_downloader::filter::build_key_filter;
//! use trades_archive_downloader::listing::list_files;
//! use trades_archive_downloader::store::{S3ObjectStore, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bucket = "data.binance.vision";
//! let prefix = "data/spot/monthly/trades/";
//! let store = Arc::new(S3ObjectStore::new(StoreConfig::default())?);
//!
//! let filter = build_key_filter(["btcusdt"], Some("2024-01"), Some("2024-03"))?;
//! let keys = list_files(store.as_ref(), bucket, prefix, &filter).await?;
//!
//! let summary = DownloadExecutor::new(store, bucket, prefix)
//!     .download_all(&keys, Path::new("./archives"))
//!     .await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`key`] - Archive key recognition and field extraction
//! - [`filter`] - Symbol/month filter construction and matching
//! - [`store`] - Object store abstraction and the S3 backend
//! - [`listing`] - Paginated listing into a filtered, sorted key list
//! - [`output`] - Key to local path mapping
//! - [`downloader`] - Retry, worker pool and outcome tallies
//! - [`cli`] - `list` and `download` commands

#![warn(missing_docs)]
#![warn(clippy::all)]

/// CLI command implementations
pub mod cli;

/// Download orchestration
pub mod downloader;

/// Filter construction and key matching
pub mod filter;

/// Archive key parsing
pub mod key;

/// Bucket listing
pub mod listing;

/// Tracing subscriber setup
pub mod logging;

/// Local output layout
pub mod output;

/// Object storage access
pub mod store;

// Re-export commonly used types
pub use downloader::{BatchSummary, DownloadError, DownloadExecutor, TaskOutcome};
pub use filter::{build_key_filter, filter_trade_keys, FilterError, KeyFilter};
pub use key::{key_month, key_symbol, parse_month, MonthParseError};
pub use listing::list_files;
pub use store::{ObjectStore, StoreError};
