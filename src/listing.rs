//! Bucket listing with tolerant page parsing
//!
//! Pages come from the store loosely typed. Anything that does not look like
//! `{"Contents": [{"Key": "<string>"}, ...]}` is skipped entry by entry, so a
//! single odd page never aborts a listing.

use crate::filter::{filter_trade_keys, KeyFilter};
use crate::store::{ListPage, ObjectStore, StoreResult};
use futures::StreamExt;
use tracing::{debug, info};

/// Flatten raw listing pages into the string keys they contain.
///
/// Pages without a `Contents` array and objects without a string `Key` are
/// dropped silently.
pub fn iter_keys_from_pages<I>(pages: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = ListPage>,
{
    pages.into_iter().flat_map(keys_in_page)
}

fn keys_in_page(page: ListPage) -> Vec<String> {
    let Some(contents) = page.get("Contents").and_then(|c| c.as_array()) else {
        debug!("Skipping listing page without a Contents array");
        return Vec::new();
    };

    contents
        .iter()
        .filter_map(|object| object.get("Key").and_then(|k| k.as_str()))
        .map(str::to_string)
        .collect()
}

/// List every key under `prefix` in `bucket` that matches `filter`.
///
/// Pages are pulled one at a time. The result is sorted ascending.
///
/// # Errors
///
/// Returns the store error if any page request fails.
pub async fn list_files(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
    filter: &KeyFilter,
) -> StoreResult<Vec<String>> {
    let mut pages = store.list_pages(bucket, prefix);
    let mut keys = Vec::new();
    let mut page_count = 0usize;

    while let Some(page) = pages.next().await {
        page_count += 1;
        keys.extend(keys_in_page(page?));
    }

    debug!(pages = page_count, objects = keys.len(), "Listing complete");

    let matched = filter_trade_keys(keys, prefix, filter);
    info!("Found {} matching files", matched.len());
    Ok(matched)
}
