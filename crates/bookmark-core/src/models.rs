//! Data models for bookmark
//!
//! A bookmark is nothing more than a normalized absolute URL. The normalized
//! string is also the deduplication key in the store.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::{Position, Url};

use crate::error::ParseUrlError;

/// A saved bookmark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Bookmark {
    /// The normalized URL
    pub url: String,
}

impl Bookmark {
    /// Parse and normalize user input into a bookmark
    pub fn parse(input: &str) -> Result<Self, ParseUrlError> {
        Ok(Self {
            url: normalize_url(input)?,
        })
    }

    /// Wrap a line read back from the bookmark file (stored verbatim)
    pub fn from_line(line: impl Into<String>) -> Self {
        Self { url: line.into() }
    }

    /// The normalized URL
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Parse `input` as an absolute URL and re-serialize it canonically.
///
/// The serializer inserts a `/` path into hierarchical URLs that have none;
/// that slash is dropped again when the input had an empty path, so
/// `http://example.com` normalizes to itself.
pub fn normalize_url(input: &str) -> Result<String, ParseUrlError> {
    let url = Url::parse(input).map_err(|source| ParseUrlError {
        input: input.to_string(),
        source,
    })?;

    if !url.cannot_be_a_base() && url.path() == "/" && has_empty_path(input) {
        return Ok(format!(
            "{}{}",
            &url[..Position::BeforePath],
            &url[Position::AfterPath..]
        ));
    }

    Ok(url.into())
}

/// Whether the authority in `input` is followed directly by a query,
/// fragment or the end of the string.
fn has_empty_path(input: &str) -> bool {
    let Some((_, rest)) = input.split_once("://") else {
        return false;
    };
    match rest.find(|c: char| matches!(c, '/' | '\\' | '?' | '#')) {
        Some(i) => !matches!(rest.as_bytes()[i], b'/' | b'\\'),
        None => true,
    }
}
