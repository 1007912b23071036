use std::path::Path;
use trades_archive_downloader::output::local_path_for_key;

use crate::support::PREFIX;

#[test]
fn test_key_under_prefix_keeps_symbol_dir() {
    let path = local_path_for_key(
        &format!("{PREFIX}ETHUSDT/ETHUSDT-trades-2023-11.zip"),
        PREFIX,
        Path::new("archives"),
    );
    assert_eq!(
        path,
        Path::new("archives").join("ETHUSDT").join("ETHUSDT-trades-2023-11.zip")
    );
}

#[test]
fn test_key_outside_prefix_is_mirrored() {
    let path = local_path_for_key("k1.zip", PREFIX, Path::new("archives"));
    assert_eq!(path, Path::new("archives").join("k1.zip"));
}

#[test]
fn test_parent_segments_cannot_escape_target() {
    let target = Path::new("archives");
    let path = local_path_for_key("../../etc/passwd", PREFIX, target);
    assert!(path.starts_with(target));
    assert!(!path.components().any(|c| c == std::path::Component::ParentDir));
}

#[test]
fn test_prefixed_keys_map_to_their_remainder() {
    let target = Path::new("archives");
    let remainders = [
        "BTCUSDT/BTCUSDT-trades-2024-01.zip",
        "ETHUSDT/ETHUSDT-trades-2023-12.zip",
        "1000SHIBUSDT/1000SHIBUSDT-trades-2022-06.zip",
        "top-level.zip",
    ];
    for remainder in remainders {
        let key = format!("{PREFIX}{remainder}");
        let expected = remainder.split('/').fold(target.to_path_buf(), |p, s| p.join(s));
        assert_eq!(local_path_for_key(&key, PREFIX, target), expected, "{key}");
    }
}

#[test]
fn test_odd_segments_are_rewritten() {
    let path = local_path_for_key(&format!("{PREFIX}a//b/./../c.zip"), PREFIX, Path::new("archives"));
    assert_eq!(path, Path::new("archives").join("a").join("b").join("__").join("c.zip"));
}
