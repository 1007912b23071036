//! Retry with exponential backoff
//!
//! The wait between attempts goes through [`Sleeper`] so tests can record the
//! requested durations instead of sleeping.

use super::config::calculate_backoff;
use async_trait::async_trait;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of backoff delays
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the caller for `duration`
    async fn wait(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Every attempt failed, or none was allowed
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// Attempts made
    pub attempts: u32,
    /// Error from the final attempt; `None` when the budget was 0
    pub last_error: Option<E>,
}

/// Run `operation` up to `attempts` times.
///
/// `operation` receives the 1-based attempt number. After every failed
/// attempt, the last one included, the caller waits
/// [`calculate_backoff`]`(attempt)` on `sleeper`. A budget of 0 never calls
/// `operation` and never sleeps.
pub async fn retry_with_backoff<T, E, F, Fut>(
    label: &str,
    attempts: u32,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> Result<(T, u32), RetryExhausted<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if attempts == 0 {
        return Err(RetryExhausted {
            attempts: 0,
            last_error: None,
        });
    }
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(label = %label, attempt, "Succeeded after retry");
                }
                return Ok((value, attempt));
            }
            Err(e) => {
                let backoff = calculate_backoff(attempt);
                warn!(
                    attempt,
                    max_attempts = attempts,
                    backoff_secs = backoff.as_secs(),
                    "Attempt {}/{} failed for {}: {}",
                    attempt,
                    attempts,
                    label,
                    e
                );
                sleeper.wait(backoff).await;

                if attempt >= attempts {
                    return Err(RetryExhausted {
                        attempts,
                        last_error: Some(e),
                    });
                }
                attempt += 1;
            }
        }
    }
}
