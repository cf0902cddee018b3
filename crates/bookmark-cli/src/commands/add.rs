//! Add command handler

use anyhow::Result;
use tracing::debug;

use bookmark_core::{Bookmark, BookmarkStore, Fetcher, StoreError};

use crate::output::Output;

/// Save `input` after confirming the page can be fetched
///
/// The URL is normalized first and refused if already stored. The backing
/// file is only written once the fetch has succeeded.
pub fn add(
    store: &mut BookmarkStore,
    fetcher: &Fetcher,
    input: &str,
    output: &Output,
) -> Result<()> {
    let bookmark = Bookmark::parse(input)?;
    if store.contains(bookmark.as_str()) {
        return Err(StoreError::Duplicate { url: bookmark.url }.into());
    }

    let outcome = fetcher.fetch(bookmark.as_str())?;
    debug!(
        "fetched {} (status {}, {} retries)",
        outcome.url, outcome.status, outcome.retries
    );

    store.append(bookmark.clone())?;
    output.print_saved(&bookmark, &outcome)
}
