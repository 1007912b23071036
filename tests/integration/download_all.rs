use std::sync::Arc;
use std::time::Duration;
use trades_archive_downloader::downloader::{DownloadError, DownloadExecutor};

use crate::support::{capture_logs, FakeStore, RecordingSleeper, BUCKET, PREFIX};

fn keys(symbols: &[&str]) -> Vec<String> {
    symbols
        .iter()
        .map(|s| format!("{PREFIX}{s}/{s}-trades-2024-01.zip"))
        .collect()
}

#[tokio::test]
async fn test_dry_run_never_creates_target() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("archives");
    let store = Arc::new(FakeStore::new());

    let summary = DownloadExecutor::new(store.clone(), BUCKET, PREFIX)
        .with_dry_run(true)
        .download_all(&keys(&["BTCUSDT", "ETHUSDT"]), &target)
        .await
        .unwrap();

    assert_eq!(summary.planned, 2);
    assert_eq!(store.call_count(), 0);
    assert!(!target.exists());
}

#[tokio::test]
async fn test_one_failing_key_does_not_stop_batch() {
    let (logs, _guard) = capture_logs();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("archives");
    let store = Arc::new(FakeStore::new().fail_keys_containing("ETHUSDT"));
    let sleeper = RecordingSleeper::new();
    let batch = keys(&["BTCUSDT", "ETHUSDT"]);

    let summary = DownloadExecutor::new(store.clone(), BUCKET, PREFIX)
        .with_sleeper(sleeper.clone())
        .with_max_workers(1)
        .with_retries(1)
        .download_all(&batch, &target)
        .await
        .unwrap();

    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.failed, 1);
    assert!(target.join("BTCUSDT/BTCUSDT-trades-2024-01.zip").is_file());
    assert!(!target.join("ETHUSDT/ETHUSDT-trades-2024-01.zip").exists());
    assert_eq!(store.fetched_keys(), batch);
    assert_eq!(sleeper.secs(), vec![2]);

    let output = logs.contents();
    assert!(output.contains("All downloads completed"));
    assert!(output.contains("Failed to download"));
}

#[tokio::test]
async fn test_mixed_batch_skips_existing() {
    let dir = tempfile::tempdir().unwrap();
    let existing = dir.path().join("ETHUSDT/ETHUSDT-trades-2024-01.zip");
    std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
    std::fs::write(&existing, b"old").unwrap();

    let store = Arc::new(FakeStore::new());
    let summary = DownloadExecutor::new(store.clone(), BUCKET, PREFIX)
        .with_max_workers(3)
        .download_all(&keys(&["BTCUSDT", "ETHUSDT", "BNBUSDT"]), dir.path())
        .await
        .unwrap();

    assert_eq!(summary.downloaded, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.total(), 3);
    assert!(summary.is_success());
    assert_eq!(store.call_count(), 2);
}

#[tokio::test]
async fn test_every_key_reaches_terminal_state() {
    let dir = tempfile::tempdir().unwrap();
    let symbols: Vec<String> = (0..25).map(|i| format!("SYM{i:02}")).collect();
    let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
    let batch = keys(&refs);

    let store = Arc::new(FakeStore::new());
    let summary = DownloadExecutor::new(store.clone(), BUCKET, PREFIX)
        .with_max_workers(4)
        .download_all(&batch, dir.path())
        .await
        .unwrap();

    assert_eq!(summary.downloaded, 25);
    let mut fetched = store.fetched_keys();
    fetched.sort();
    assert_eq!(fetched, batch);
}

#[tokio::test]
async fn test_unwritable_target_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"").unwrap();

    let store = Arc::new(FakeStore::new());
    let err = DownloadExecutor::new(store.clone(), BUCKET, PREFIX)
        .download_all(&keys(&["BTCUSDT"]), &blocker.join("archives"))
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::DirectoryError { .. }));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_transfers_never_exceed_worker_count() {
    let dir = tempfile::tempdir().unwrap();
    let symbols: Vec<String> = (0..30).map(|i| format!("PAIR{i:02}")).collect();
    let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
    let batch = keys(&refs);

    let store = Arc::new(FakeStore::new().with_fetch_delay(Duration::from_millis(20)));
    let summary = DownloadExecutor::new(store.clone(), BUCKET, PREFIX)
        .with_max_workers(3)
        .download_all(&batch, dir.path())
        .await
        .unwrap();

    assert_eq!(summary.downloaded, 30);
    assert_eq!(store.call_count(), 30);
    assert!(store.peak_in_flight() <= 3, "peak {}", store.peak_in_flight());
    assert!(store.peak_in_flight() >= 2, "transfers never overlapped");
}
