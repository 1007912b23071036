use chrono::NaiveDate;
use trades_archive_downloader::key::{is_trade_archive_key, key_month, key_symbol, ParsedKey};
use trades_archive_downloader::{parse_month, MonthParseError};

use crate::support::PREFIX;

fn ymd(y: i32, m: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, 1)
}

#[test]
fn test_parse_month_first_day() {
    assert_eq!(parse_month(Some("2024-02")).unwrap(), ymd(2024, 2));
}

#[test]
fn test_parse_month_absent_is_unbounded() {
    assert_eq!(parse_month(None).unwrap(), None);
    assert_eq!(parse_month(Some("")).unwrap(), None);
}

#[test]
fn test_parse_month_rejects_out_of_range() {
    let err = parse_month(Some("2024-13")).unwrap_err();
    let MonthParseError::InvalidMonth { input, .. } = err;
    assert_eq!(input, "2024-13");
}

#[test]
fn test_archive_key_recognition() {
    let cases = [
        ("BTCUSDT-trades-2024-01.zip", true),
        ("BTCUSDT-trades-2024-01.CHECKSUM.zip", false),
        ("BTCUSDT-trades-2024-01.csv", false),
        ("notzip", false),
    ];
    for (key, expected) in cases {
        assert_eq!(is_trade_archive_key(key), expected, "{key}");
    }
}

#[test]
fn test_key_symbol_requires_prefix() {
    let key = format!("{PREFIX}BTCUSDT/BTCUSDT-trades-2024-01.zip");
    assert_eq!(key_symbol(PREFIX, &key), Some("BTCUSDT"));
    assert_eq!(key_symbol("wrong/prefix/", &key), None);
}

#[test]
fn test_key_month_is_lenient() {
    let cases = [
        (format!("{PREFIX}BTCUSDT/BTCUSDT-trades-2024-01.zip"), ymd(2024, 1)),
        ("BTCUSDT-trades-2024-12.zip".to_string(), ymd(2024, 12)),
        ("BTCUSDT-trades-2024-00.zip".to_string(), None),
        ("BTCUSDT-trades-2024.zip".to_string(), None),
        ("BTCUSDT-trades-2024-01.CHECKSUM.zip".to_string(), None),
        ("BTCUSDT-trades-2024-01.csv".to_string(), None),
    ];
    for (key, expected) in cases {
        assert_eq!(key_month(&key), expected, "{key}");
    }
}

#[test]
fn test_parsed_key_outside_prefix_has_month_only() {
    let parsed = ParsedKey::parse(PREFIX, "other/prefix/BTCUSDT/BTCUSDT-trades-2024-01.zip");
    assert_eq!(parsed.symbol, None);
    assert_eq!(parsed.month, ymd(2024, 1));
}
