//! Download configuration constants

use std::time::Duration;

/// Public bucket holding the archives
pub const DEFAULT_BUCKET: &str = "data.binance.vision";

/// Key prefix of the monthly spot trade archives
pub const DEFAULT_PREFIX: &str = "data/spot/monthly/trades/";

/// Region the default bucket lives in
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Attempts per key before giving up
pub const DEFAULT_RETRIES: u32 = 3;

/// Upper bound accepted for the retry budget.
/// Backoff is uncapped, so 10 attempts already waits ~34 minutes in total.
pub const MAX_RETRIES: u32 = 10;

/// Concurrent transfers when none is requested
pub const DEFAULT_WORKERS: usize = 8;

/// Upper bound accepted for the worker count
pub const MAX_WORKERS: usize = 64;

/// Lower bound used when no `--start` is given to the download command
pub const DEFAULT_START_MONTH: &str = "1970-01";

/// Backoff after failed attempt `attempt` (1-based): `2^attempt` seconds
pub fn calculate_backoff(attempt: u32) -> Duration {
    let secs = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_secs(secs)
}
