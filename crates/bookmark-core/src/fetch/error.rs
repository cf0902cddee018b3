//! Fetch error type.

use thiserror::Error;

/// Error returned by a page fetch
///
/// Network failures abort immediately; the status-driven variants are
/// produced by the retry policy.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The target is not a valid request URL
    #[error("building request for {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// DNS, connection, TLS or timeout failure
    #[error("fetching {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read to the end
    #[error("reading response body: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered 404
    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// 3xx response without a usable Location header
    #[error("resolving redirect: {url}")]
    Redirect { url: String },

    /// Redirect chain longer than the configured limit
    #[error("too many redirects ({limit}) starting from {url}")]
    TooManyRedirects { url: String, limit: u32 },

    /// Retry budget spent on 429/503 backoffs or 500 responses
    #[error("max retries exceeded: {url}")]
    RetriesExhausted { url: String, retries: u32 },
}

impl FetchError {
    /// Whether the error came from the network rather than an HTTP status
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FetchError::Request { .. } | FetchError::ReadBody { .. }
        )
    }
}
