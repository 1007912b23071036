use trades_archive_downloader::listing::{iter_keys_from_pages, list_files};
use trades_archive_downloader::{build_key_filter, KeyFilter, StoreError};

use crate::support::{capture_logs, sample_keys, sample_pages, FakeStore, BUCKET, PREFIX};

#[test]
fn test_iter_keys_skips_malformed_entries() {
    let keys: Vec<String> = iter_keys_from_pages(sample_pages()).collect();
    let sample = sample_keys();
    assert_eq!(keys, sample[..5].to_vec());
}

#[tokio::test]
async fn test_list_files_filters_pages_and_logs_count() {
    let (logs, _guard) = capture_logs();
    let store = FakeStore::with_pages(sample_pages());
    let filter = build_key_filter(["BTCUSDT"], Some("2024-02"), Some("2024-03")).unwrap();

    let keys = list_files(&store, BUCKET, PREFIX, &filter).await.unwrap();

    assert_eq!(keys, vec![format!("{PREFIX}BTCUSDT/BTCUSDT-trades-2024-02.zip")]);
    assert!(logs.contents().contains("Found 1 matching files"));
}

#[tokio::test]
async fn test_list_files_without_filter_is_sorted() {
    let store = FakeStore::with_pages(sample_pages());

    let keys = list_files(&store, BUCKET, PREFIX, &KeyFilter::any()).await.unwrap();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys.len(), 4);
    assert!(keys.iter().all(|k| !k.contains("CHECKSUM")));
}

#[tokio::test]
async fn test_list_files_empty_bucket() {
    let store = FakeStore::new();
    let keys = list_files(&store, BUCKET, PREFIX, &KeyFilter::any()).await.unwrap();
    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_list_files_propagates_listing_error() {
    let store = FakeStore::failing_list();
    let err = list_files(&store, BUCKET, PREFIX, &KeyFilter::any())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ListError { .. }));
}
