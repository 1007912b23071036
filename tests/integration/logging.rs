use tracing::info;
use trades_archive_downloader::logging::{LogFormat, LoggingConfig, LoggingError};

use crate::support::LogBuffer;

#[test]
fn test_human_subscriber_writes_to_buffer() {
    let buffer = LogBuffer::default();
    let subscriber = LoggingConfig::new("info").subscriber(buffer.clone()).unwrap();

    tracing::subscriber::with_default(subscriber, || {
        info!(files = 3, "Found 3 matching files");
    });

    assert!(buffer.contents().contains("Found 3 matching files"));
}

#[test]
fn test_json_subscriber_emits_objects() {
    let buffer = LogBuffer::default();
    let subscriber = LoggingConfig::new("info")
        .with_format(LogFormat::Json)
        .subscriber(buffer.clone())
        .unwrap();

    tracing::subscriber::with_default(subscriber, || {
        info!(files = 3, "listing done");
    });

    let contents = buffer.contents();
    let line = contents.lines().next().unwrap();
    let value: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(value["fields"]["message"], "listing done");
    assert_eq!(value["fields"]["files"], 3);
}

#[test]
fn test_invalid_level_is_reported() {
    let err = LoggingConfig::new("loud")
        .subscriber(LogBuffer::default())
        .err()
        .unwrap();
    assert!(matches!(err, LoggingError::InvalidLevel(_)));
}
