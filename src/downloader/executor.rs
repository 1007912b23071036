//! Download executor: per-key transfer with retry, and the batch worker pool

use crate::downloader::config::{DEFAULT_RETRIES, DEFAULT_WORKERS, MAX_WORKERS};
use crate::downloader::progress::{BatchSummary, OutcomeCounters};
use crate::downloader::retry::{retry_with_backoff, Sleeper, TokioSleeper};
use crate::downloader::task::{DownloadTask, TaskOutcome};
use crate::downloader::DownloadError;
use crate::output::local_path_for_key;
use crate::store::ObjectStore;
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, Instrument};

type SharedReceiver = Arc<Mutex<mpsc::Receiver<DownloadTask>>>;

/// Downloads archive keys from one bucket into a local directory tree.
///
/// Cheap to clone; each pool worker holds its own copy.
#[derive(Clone)]
pub struct DownloadExecutor {
    store: Arc<dyn ObjectStore>,
    sleeper: Arc<dyn Sleeper>,
    bucket: String,
    prefix: String,
    retries: u32,
    max_workers: usize,
    overwrite: bool,
    dry_run: bool,
    progress: Option<ProgressBar>,
}

impl DownloadExecutor {
    /// Executor for keys under `prefix` in `bucket`
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            sleeper: Arc::new(TokioSleeper),
            bucket: bucket.into(),
            prefix: prefix.into(),
            retries: DEFAULT_RETRIES,
            max_workers: DEFAULT_WORKERS,
            overwrite: false,
            dry_run: false,
            progress: None,
        }
    }

    /// Attempts per key. 0 allows no attempt, so every fetch fails
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Concurrent transfers, clamped to `1..=MAX_WORKERS`
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.clamp(1, MAX_WORKERS);
        self
    }

    /// Replace files that already exist
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Report the plan without touching the filesystem or the store
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Use a custom backoff sleeper
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Advance `progress` once per finished key
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Attempts per key
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Worker count
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Build the task for `key` rooted at `target_dir`
    pub fn task_for(&self, key: &str, target_dir: &Path) -> DownloadTask {
        DownloadTask::new(key, local_path_for_key(key, &self.prefix, target_dir))
    }

    /// Download a single key into `target_dir`.
    ///
    /// Dry run logs the mapping and returns [`TaskOutcome::Planned`]. An
    /// existing destination is left alone unless overwrite is set. Otherwise
    /// the parent directory is created and the fetch is retried with backoff.
    ///
    /// # Errors
    ///
    /// [`DownloadError::DirectoryError`] if the parent cannot be created,
    /// [`DownloadError::RetriesExhausted`] if every attempt fails and
    /// [`DownloadError::NoAttempts`] if the retry budget is 0.
    pub async fn download_file(
        &self,
        key: &str,
        target_dir: &Path,
    ) -> Result<TaskOutcome, DownloadError> {
        let task = self.task_for(key, target_dir);
        self.run_task(&task).await
    }

    async fn run_task(&self, task: &DownloadTask) -> Result<TaskOutcome, DownloadError> {
        let destination = &task.destination;

        if self.dry_run {
            info!(
                "[dry-run] Would download: {} -> {}",
                task.key,
                destination.display()
            );
            return Ok(TaskOutcome::Planned);
        }

        if !self.overwrite && destination.exists() {
            info!(path = %destination.display(), "Skipping {} (already exists)", task.key);
            return Ok(TaskOutcome::Skipped);
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| DownloadError::DirectoryError {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let (_, attempts) = retry_with_backoff(
            &task.key,
            self.retries,
            self.sleeper.as_ref(),
            |_| self.store.fetch(&self.bucket, &task.key, destination),
        )
        .await
        .map_err(|exhausted| match exhausted.last_error {
            Some(source) => DownloadError::RetriesExhausted {
                key: task.key.clone(),
                attempts: exhausted.attempts,
                source,
            },
            None => DownloadError::NoAttempts {
                key: task.key.clone(),
            },
        })?;

        info!(path = %destination.display(), attempts, "Downloaded {}", task.key);
        Ok(TaskOutcome::Downloaded { attempts })
    }

    /// Download every key in `keys` into `target_dir`.
    ///
    /// Runs at most `max_workers` transfers at once. A key that fails is
    /// logged and counted in the summary; it never stops the others. The call
    /// returns after every key has reached a terminal outcome.
    ///
    /// # Errors
    ///
    /// Only [`DownloadError::DirectoryError`] when `target_dir` itself cannot
    /// be created. Dry run never touches the filesystem.
    pub async fn download_all(
        &self,
        keys: &[String],
        target_dir: &Path,
    ) -> Result<BatchSummary, DownloadError> {
        let started = Instant::now();
        let counters = Arc::new(OutcomeCounters::default());

        if self.dry_run {
            for key in keys {
                let outcome = self.run_task(&self.task_for(key, target_dir)).await?;
                counters.record(outcome);
            }
            let summary = counters.snapshot(started.elapsed());
            info!("Dry run complete: {}", summary);
            return Ok(summary);
        }

        tokio::fs::create_dir_all(target_dir)
            .await
            .map_err(|source| DownloadError::DirectoryError {
                path: target_dir.to_path_buf(),
                source,
            })?;

        let workers = self.max_workers.min(keys.len()).max(1);
        info!(files = keys.len(), workers, "Starting downloads");

        let (sender, receiver) = mpsc::channel::<DownloadTask>(workers);
        let receiver: SharedReceiver = Arc::new(Mutex::new(receiver));

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            let executor = self.clone();
            let receiver = Arc::clone(&receiver);
            let counters = Arc::clone(&counters);
            pool.spawn(async move { executor.worker_loop(worker_id, receiver, counters).await });
        }

        for (dispatched, key) in keys.iter().enumerate() {
            if sender.send(self.task_for(key, target_dir)).await.is_err() {
                let remaining = keys.len() - dispatched;
                error!(remaining, "Download workers exited early");
                counters.record_failed(remaining);
                break;
            }
        }
        drop(sender);

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Download worker panicked");
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        let summary = counters.snapshot(started.elapsed());
        info!("All downloads completed: {}", summary);
        Ok(summary)
    }

    async fn worker_loop(
        &self,
        worker_id: usize,
        receiver: SharedReceiver,
        counters: Arc<OutcomeCounters>,
    ) {
        loop {
            let next = receiver.lock().await.recv().await;
            let Some(task) = next else {
                break;
            };

            let span = info_span!("download", worker = worker_id, key = %task.key);
            let outcome = match self.run_task(&task).instrument(span).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(worker = worker_id, "Failed to download {}: {}", task.key, e);
                    TaskOutcome::Failed
                }
            };
            counters.record(outcome);

            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }
        debug!(worker = worker_id, "Worker finished");
    }
}
