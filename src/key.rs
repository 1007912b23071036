//! Archive key parsing
//!
//! Object keys follow the layout `<prefix><SYMBOL>/<SYMBOL>-trades-<YYYY>-<MM>.zip`.
//! Everything here is pure string/date work with no I/O.

use chrono::NaiveDate;

/// Literal marker between the symbol and the date in an archive file name
const TRADES_MARKER: &str = "trades";

/// Extension every trade archive carries (and nothing else)
const ARCHIVE_EXTENSION: &str = ".zip";

/// Errors raised when an explicit month string cannot be parsed
#[derive(Debug, thiserror::Error)]
pub enum MonthParseError {
    /// The text is not a valid `YYYY-MM` calendar month
    #[error("invalid month '{input}': expected YYYY-MM ({source})")]
    InvalidMonth {
        /// Raw text supplied by the caller
        input: String,
        /// Underlying chrono failure
        #[source]
        source: chrono::ParseError,
    },
}

/// Parse a `YYYY-MM` string into the first day of that month.
///
/// Absent or empty input means "no bound" and yields `Ok(None)`. Anything
/// else that is not a real calendar month is an error, including
/// well-formed but out-of-range months such as `2024-13`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use trades_archive_downloader::key::parse_month;
///
/// assert_eq!(
///     parse_month(Some("2024-02")).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 2, 1)
/// );
/// assert_eq!(parse_month(Some("")).unwrap(), None);
/// assert!(parse_month(Some("2024-13")).is_err());
/// ```
pub fn parse_month(text: Option<&str>) -> Result<Option<NaiveDate>, MonthParseError> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };

    NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d")
        .map(Some)
        .map_err(|source| MonthParseError::InvalidMonth {
            input: text.to_string(),
            source,
        })
}

/// Last `/`-separated segment of a key
fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Split an archive file name into `(symbol, year, month)` text parts.
///
/// Returns `None` unless the name has exactly one dot, ends in `.zip`, and
/// its stem reads `SYMBOL-trades-YYYY-MM` with a 4-digit year and 2-digit month.
fn split_archive_name(name: &str) -> Option<(&str, &str, &str)> {
    if name.matches('.').count() != 1 {
        return None;
    }
    let stem = name.strip_suffix(ARCHIVE_EXTENSION)?;

    let mut parts = stem.rsplitn(4, '-');
    let month = parts.next()?;
    let year = parts.next()?;
    let marker = parts.next()?;
    let symbol = parts.next()?;

    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if symbol.is_empty() || marker != TRADES_MARKER || !digits(year, 4) || !digits(month, 2) {
        return None;
    }

    Some((symbol, year, month))
}

/// Whether a key names a monthly trade archive (`SYMBOL-trades-YYYY-MM.zip`).
///
/// Checksum companions (`...-2024-01.CHECKSUM.zip`), other extensions and
/// names with too few date segments are rejected. Never fails.
pub fn is_trade_archive_key(key: &str) -> bool {
    split_archive_name(file_name(key)).is_some()
}

/// Symbol directory immediately following `prefix`, if `key` lives under it.
///
/// Matching is case sensitive and the symbol is returned verbatim.
pub fn key_symbol<'a>(prefix: &str, key: &'a str) -> Option<&'a str> {
    let rest = key.strip_prefix(prefix)?;
    rest.split('/').next()
}

/// Calendar month encoded in a trade archive key.
///
/// Unlike [`parse_month`] this never errors: keys that are not trade
/// archives, or whose month is out of range (`2024-00`), simply have no month.
pub fn key_month(key: &str) -> Option<NaiveDate> {
    let (_, year, month) = split_archive_name(file_name(key))?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Symbol and month extracted from a single key on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey<'a> {
    /// Symbol directory under the listing prefix
    pub symbol: Option<&'a str>,
    /// First day of the archive's month
    pub month: Option<NaiveDate>,
}

impl<'a> ParsedKey<'a> {
    /// Parse `key` relative to `prefix`
    pub fn parse(prefix: &str, key: &'a str) -> Self {
        Self {
            symbol: key_symbol(prefix, key),
            month: key_month(key),
        }
    }
}
