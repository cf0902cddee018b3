//! Page fetching with bounded retry.
//!
//! A page is fetched once to confirm it is reachable; its content is read
//! and thrown away. Status codes are mapped to transitions by `policy`, and
//! `client` drives the HTTP requests through them.

mod client;
mod error;
mod policy;

pub use client::{FetchOptions, FetchOutcome, Fetcher, Sleep, ThreadSleep};
pub use error::FetchError;
pub use policy::{retry_after_delay, ResponseSummary, RetryPolicy, RetryState, Transition};
