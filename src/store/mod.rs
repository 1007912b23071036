//! Object storage access
//!
//! The downloader only needs two things from a bucket: a paginated key
//! listing and a single-object fetch to a local path. [`ObjectStore`] is that
//! seam; [`s3::S3ObjectStore`] is the production implementation.

use async_trait::async_trait;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;

pub mod s3;

pub use s3::{S3ObjectStore, StoreConfig};

/// Object store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Client could not be constructed
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A listing request failed
    #[error("listing failed for {bucket}/{prefix}: {message}")]
    ListError {
        /// Bucket being listed
        bucket: String,
        /// Key prefix being listed
        prefix: String,
        /// Transport or service error text
        message: String,
    },

    /// A single object transfer failed
    #[error("transfer of {key} failed: {message}")]
    TransferError {
        /// Object key
        key: String,
        /// Transport or service error text
        message: String,
    },

    /// Local filesystem error while writing an object
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// One raw listing page.
///
/// Pages are kept loosely typed (`{"Contents": [{"Key": "..."}, ...]}`) so
/// that entries of unexpected shape can be dropped individually by the lister
/// instead of failing the whole listing.
pub type ListPage = serde_json::Value;

/// Stream of listing pages, in bucket order
pub type PageStream<'a> = Pin<Box<dyn Stream<Item = StoreResult<ListPage>> + Send + 'a>>;

/// Bucket operations the lister and downloader depend on.
///
/// Implementations must be safe to share across concurrent download workers.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Enumerate every object under `prefix` as a sequence of pages
    fn list_pages<'a>(&'a self, bucket: &str, prefix: &str) -> PageStream<'a>;

    /// Fetch `key` into `destination`.
    ///
    /// The parent directory already exists. Any error is treated as
    /// transient by the caller and retried.
    async fn fetch(&self, bucket: &str, key: &str, destination: &Path) -> StoreResult<()>;
}
