//! Per-key download tasks and their terminal outcomes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One unit of work: fetch `key` to `destination`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTask {
    /// Full bucket key
    pub key: String,
    /// Local file the object is written to
    pub destination: PathBuf,
}

impl DownloadTask {
    /// Create a task
    pub fn new(key: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            destination: destination.into(),
        }
    }
}

/// How a task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Object fetched; `attempts` is 1 when the first try succeeded
    Downloaded {
        /// Attempts used, including the successful one
        attempts: u32,
    },
    /// Destination already present and overwrite disabled
    Skipped,
    /// Dry run: mapping reported, nothing fetched
    Planned,
    /// Retry budget exhausted
    Failed,
}

impl TaskOutcome {
    /// Whether the key ended in a usable state
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}
