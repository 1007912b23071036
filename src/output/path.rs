//! Local destination paths for bucket keys
//!
//! Keys under the listing prefix keep their sub-path below the target
//! directory, so `data/spot/monthly/trades/BTCUSDT/BTCUSDT-trades-2024-01.zip`
//! lands in `<target>/BTCUSDT/BTCUSDT-trades-2024-01.zip`. Keys outside the
//! prefix are mirrored in full.
//!
//! # Usage Example
//!
//! ```rust
//! use std::path::Path;
//! use trades_archive_downloader::output::local_path_for_key;
//!
//! let path = local_path_for_key(
//!     "data/spot/monthly/trades/BTCUSDT/BTCUSDT-trades-2024-01.zip",
//!     "data/spot/monthly/trades/",
//!     Path::new("out"),
//! );
//! assert_eq!(
//!     path,
//!     Path::new("out").join("BTCUSDT").join("BTCUSDT-trades-2024-01.zip")
//! );
//! ```

use std::path::{Path, PathBuf};

/// Map a bucket key to its destination under `target_dir`.
///
/// Pure: no existence checks and no directory creation.
///
/// The remainder after `prefix` is joined segment by segment, so keys are not
/// always mirrored verbatim: empty and `.` segments are dropped and `..`
/// becomes `__`. `a//b/../c.zip` therefore lands at `a/b/__/c.zip`, and no key
/// resolves outside `target_dir`.
pub fn local_path_for_key(key: &str, prefix: &str, target_dir: &Path) -> PathBuf {
    let relative = key.strip_prefix(prefix).unwrap_or(key);
    join_key_segments(target_dir, relative)
}

/// Join `/`-separated key segments onto `root` using the local separator.
///
/// Empty and `.` segments are dropped and `..` becomes `__`, so a key can
/// never resolve outside `root`.
fn join_key_segments(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(|segment| if segment == ".." { "__" } else { segment })
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}
