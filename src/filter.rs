//! Symbol and month-range filtering of archive keys

use crate::key::{is_trade_archive_key, parse_month, MonthParseError, ParsedKey};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Errors raised while building a [`KeyFilter`] from caller input
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// `--start` could not be parsed
    #[error("invalid start month: {0}")]
    InvalidStart(#[source] MonthParseError),

    /// `--end` could not be parsed
    #[error("invalid end month: {0}")]
    InvalidEnd(#[source] MonthParseError),
}

/// Normalized selection criteria for archive keys.
///
/// `None` fields impose no constraint. Month bounds are inclusive; an
/// inverted range is accepted and simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFilter {
    /// Uppercase symbols to keep
    pub symbols: Option<BTreeSet<String>>,
    /// First month to keep (first day of month)
    pub start_month: Option<NaiveDate>,
    /// Last month to keep (first day of month)
    pub end_month: Option<NaiveDate>,
}

impl KeyFilter {
    /// Filter that keeps every trade archive key
    pub fn any() -> Self {
        Self::default()
    }

    fn has_month_bound(&self) -> bool {
        self.start_month.is_some() || self.end_month.is_some()
    }

    fn month_in_range(&self, month: NaiveDate) -> bool {
        self.start_month.map_or(true, |start| month >= start)
            && self.end_month.map_or(true, |end| month <= end)
    }
}

/// Uppercase and deduplicate symbols; empty input means "any symbol".
pub fn normalize_symbols<I, S>(raw: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let symbols: BTreeSet<String> = raw
        .into_iter()
        .map(|s| s.as_ref().to_uppercase())
        .collect();

    if symbols.is_empty() {
        None
    } else {
        Some(symbols)
    }
}

/// Build a [`KeyFilter`] from raw CLI-style input.
///
/// # Errors
///
/// Fails if `start` or `end` is present but not a valid `YYYY-MM` month.
pub fn build_key_filter<I, S>(
    symbols: I,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<KeyFilter, FilterError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(KeyFilter {
        symbols: normalize_symbols(symbols),
        start_month: parse_month(start).map_err(FilterError::InvalidStart)?,
        end_month: parse_month(end).map_err(FilterError::InvalidEnd)?,
    })
}

/// Whether `key` is a trade archive that satisfies `filter`.
///
/// A symbol constraint needs the key to live under `prefix`; a month bound
/// needs a readable month in the key name.
pub fn matches_filter(key: &str, prefix: &str, filter: &KeyFilter) -> bool {
    if !is_trade_archive_key(key) {
        return false;
    }

    let parsed = ParsedKey::parse(prefix, key);

    if let Some(symbols) = &filter.symbols {
        match parsed.symbol {
            Some(symbol) if symbols.contains(symbol) => {}
            _ => return false,
        }
    }

    if filter.has_month_bound() {
        match parsed.month {
            Some(month) if filter.month_in_range(month) => {}
            _ => return false,
        }
    }

    true
}

/// Keep the keys matching `filter`, sorted ascending.
///
/// With the fixed `YYYY-MM` naming, lexical order is also chronological
/// order within a symbol.
pub fn filter_trade_keys<I, S>(keys: I, prefix: &str, filter: &KeyFilter) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut matched: Vec<String> = keys
        .into_iter()
        .map(Into::into)
        .filter(|key| matches_filter(key, prefix, filter))
        .collect();
    matched.sort();
    matched
}
