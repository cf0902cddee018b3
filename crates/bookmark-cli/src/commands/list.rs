//! List command handler

use anyhow::Result;

use bookmark_core::BookmarkStore;

use crate::output::Output;

/// Print all bookmarks, sorted, one per line
pub fn list(store: &BookmarkStore, output: &Output) -> Result<()> {
    output.print_bookmarks(&store.list())
}
