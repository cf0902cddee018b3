//! bookmark core library
//!
//! A personal bookmark list kept in a flat file. Adding a URL fetches the
//! page once to make sure it is reachable, then appends the normalized URL
//! to the file.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = BookmarkStore::load(&config.bookmark_file)?;
//! let fetcher = Fetcher::new(&FetchOptions::from(&config))?;
//!
//! let bookmark = Bookmark::parse("https://example.com")?;
//! fetcher.fetch(bookmark.as_str())?;
//! store.append(bookmark)?;
//! ```
//!
//! # Modules
//!
//! - `store`: flat-file store with in-memory deduplication
//! - `models`: the bookmark type and URL normalization
//! - `fetch`: page fetcher and its retry policy
//! - `availability`: Wayback Machine availability lookup
//! - `config`: application configuration

pub mod availability;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod store;

pub use availability::{Availability, AvailabilityClient, AvailabilityError, Snapshot};
pub use config::Config;
pub use error::{ParseUrlError, StoreError, StoreResult};
pub use fetch::{FetchError, FetchOptions, FetchOutcome, Fetcher};
pub use models::{normalize_url, Bookmark};
pub use store::BookmarkStore;
