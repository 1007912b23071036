//! Outcome tallies for a download batch.
//!
//! Workers record terminal outcomes into shared [`OutcomeCounters`]. Once the
//! pool drains, the counters are frozen into a [`BatchSummary`] that the CLI
//! prints as text or JSON.

use super::task::TaskOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})";

/// Lock-free counters shared by the worker pool
#[derive(Debug, Default)]
pub struct OutcomeCounters {
    downloaded: AtomicUsize,
    skipped: AtomicUsize,
    planned: AtomicUsize,
    failed: AtomicUsize,
}

impl OutcomeCounters {
    /// Count one terminal outcome
    pub fn record(&self, outcome: TaskOutcome) {
        let counter = match outcome {
            TaskOutcome::Downloaded { .. } => &self.downloaded,
            TaskOutcome::Skipped => &self.skipped,
            TaskOutcome::Planned => &self.planned,
            TaskOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count `n` keys as failed without running them
    pub fn record_failed(&self, n: usize) {
        self.failed.fetch_add(n, Ordering::Relaxed);
    }

    /// Freeze the current counts
    pub fn snapshot(&self, elapsed: Duration) -> BatchSummary {
        BatchSummary {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            planned: self.planned.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Final tally of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Keys fetched
    pub downloaded: usize,
    /// Keys whose destination already existed
    pub skipped: usize,
    /// Keys reported by a dry run
    pub planned: usize,
    /// Keys that exhausted their retries
    pub failed: usize,
    /// Wall-clock time of the batch
    pub elapsed_ms: u64,
}

impl BatchSummary {
    /// Keys accounted for
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.planned + self.failed
    }

    /// True when no key failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.planned > 0 {
            return write!(f, "{} planned (dry run)", self.planned);
        }
        write!(
            f,
            "{} downloaded, {} skipped, {} failed in {:.1}s",
            self.downloaded,
            self.skipped,
            self.failed,
            self.elapsed_ms as f64 / 1000.0
        )
    }
}

/// Progress bar sized to a batch of `len` files
pub fn batch_progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}
