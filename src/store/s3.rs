//! Anonymous S3 access for public archive buckets
//!
//! Uses path-style addressing because public data buckets are commonly named
//! like domains (`data.binance.vision`), which breaks virtual-hosted TLS.

use super::{ListPage, ObjectStore, PageStream, StoreError, StoreResult};
use async_trait::async_trait;
use futures::stream;
use s3::creds::Credentials;
use s3::region::Region;
use s3::Bucket;
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::downloader::config::DEFAULT_REGION;

/// Connection settings for [`S3ObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// AWS region of the bucket (e.g. "ap-northeast-1")
    pub region: String,
    /// Custom endpoint for S3-compatible services; defaults to AWS
    pub endpoint: Option<String>,
}

impl StoreConfig {
    /// Config for an AWS region with the default endpoint
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
        }
    }

    /// Override the service endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Endpoint URL requests are sent to
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", self.region))
    }

    fn region(&self) -> Region {
        Region::Custom {
            region: self.region.clone(),
            endpoint: self.endpoint_url(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

/// Unsigned S3 client
#[derive(Clone)]
pub struct S3ObjectStore {
    config: StoreConfig,
    credentials: Credentials,
}

impl S3ObjectStore {
    /// Create an anonymous client for `config`
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let credentials = Credentials::anonymous()
            .map_err(|e| StoreError::ConfigError(format!("anonymous credentials: {e}")))?;
        Ok(Self {
            config,
            credentials,
        })
    }

    /// Connection settings in use
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn bucket(&self, name: &str) -> StoreResult<Box<Bucket>> {
        let bucket = Bucket::new(name, self.config.region(), self.credentials.clone())
            .map_err(|e| StoreError::ConfigError(format!("bucket {name}: {e}")))?;
        Ok(bucket.with_path_style())
    }
}

/// Pagination cursor for [`S3ObjectStore::list_pages`]
enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Shape a listing result as a raw page
fn to_page(contents: &[s3::serde_types::Object]) -> ListPage {
    let objects: Vec<_> = contents
        .iter()
        .map(|object| json!({ "Key": object.key, "Size": object.size }))
        .collect();
    json!({ "Contents": objects })
}

/// Sibling path a transfer is streamed to before being renamed into place
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    destination.with_file_name(name)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn list_pages<'a>(&'a self, bucket: &str, prefix: &str) -> PageStream<'a> {
        let bucket_name = bucket.to_string();
        let prefix = prefix.to_string();

        Box::pin(stream::unfold(Cursor::Start, move |cursor| {
            let bucket_name = bucket_name.clone();
            let prefix = prefix.clone();
            async move {
                let token = match cursor {
                    Cursor::Done => return None,
                    Cursor::Start => None,
                    Cursor::Next(token) => Some(token),
                };

                let list_error = |message: String| StoreError::ListError {
                    bucket: bucket_name.clone(),
                    prefix: prefix.clone(),
                    message,
                };

                let bucket = match self.bucket(&bucket_name) {
                    Ok(bucket) => bucket,
                    Err(e) => return Some((Err(e), Cursor::Done)),
                };

                match bucket.list_page(prefix.clone(), None, token, None, None).await {
                    Ok((result, _status)) => {
                        debug!(
                            objects = result.contents.len(),
                            truncated = result.is_truncated,
                            "Listed page"
                        );
                        let next = match result.next_continuation_token.clone() {
                            Some(token) if result.is_truncated => Cursor::Next(token),
                            _ => Cursor::Done,
                        };
                        Some((Ok(to_page(&result.contents)), next))
                    }
                    Err(e) => Some((Err(list_error(e.to_string())), Cursor::Done)),
                }
            }
        }))
    }

    async fn fetch(&self, bucket: &str, key: &str, destination: &Path) -> StoreResult<()> {
        let bucket = self.bucket(bucket)?;
        let partial = partial_path(destination);

        let mut file = tokio::fs::File::create(&partial).await?;
        let transfer = match bucket.get_object_to_writer(key, &mut file).await {
            Ok(status) => file.flush().await.map(|_| status).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        drop(file);

        let status = match transfer {
            Ok(status) => status,
            Err(message) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(StoreError::TransferError {
                    key: key.to_string(),
                    message,
                });
            }
        };

        if !(200..300).contains(&status) {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(StoreError::TransferError {
                key: key.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        tokio::fs::rename(&partial, destination).await?;
        debug!(key = %key, path = %destination.display(), "Object stored");
        Ok(())
    }
}
