//! Status-driven retry and redirect decisions.
//!
//! Every HTTP response moves the fetch to one of five transitions. Rules are
//! checked in order and the first match wins:
//!
//! | response                                   | transition               |
//! |--------------------------------------------|--------------------------|
//! | 404                                        | `Fatal(NotFound)`        |
//! | 429 / 503 with positive `Retry-After`      | `Backoff` (uses a retry) |
//! | 3xx                                        | `RedirectFollow`         |
//! | exactly 500                                | `Attempt` (uses a retry) |
//! | anything else                              | `Success`                |
//!
//! A 429 or 503 without a usable `Retry-After` falls through to the later
//! rows, so it ends in `Success`. Other 4xx and 5xx codes (403, 502, ...)
//! also end in `Success`; only the page being reachable at all matters.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use url::Url;

use super::error::FetchError;

/// Slack added on top of the server-supplied `Retry-After` instant, in seconds
const BACKOFF_SLACK_SECS: i64 = 60;

/// What the fetcher should do after a response
#[derive(Debug)]
pub enum Transition {
    /// Send the same request again right away
    Attempt,
    /// Sleep for the given duration, then send the same request again
    Backoff(Duration),
    /// Send the request to a new URL
    RedirectFollow(Url),
    /// Stop with an error
    Fatal(FetchError),
    /// Stop successfully
    Success,
}

/// The parts of a response the policy looks at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status: u16,
    pub retry_after: Option<String>,
    pub location: Option<String>,
}

impl ResponseSummary {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }

    pub fn with_location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }
}

/// Limits for a single fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt, shared by backoff and 500.
    pub max_retries: u32,
    /// Redirects followed before giving up. Not part of the retry budget.
    pub max_redirects: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: crate::config::DEFAULT_MAX_RETRIES,
            max_redirects: crate::config::DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// Progress of one fetch through the policy
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    retries: u32,
    redirects: u32,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            retries: 0,
            redirects: 0,
        }
    }

    /// Retries consumed so far
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Redirects followed so far
    pub fn redirects(&self) -> u32 {
        self.redirects
    }

    /// Decide the transition for `response`, received from `current` at `now`.
    pub fn next(
        &mut self,
        current: &Url,
        response: &ResponseSummary,
        now: DateTime<Utc>,
    ) -> Transition {
        let status = response.status;

        if status == 404 {
            return Transition::Fatal(FetchError::NotFound {
                url: current.to_string(),
            });
        }

        if status == 429 || status == 503 {
            let delay = response
                .retry_after
                .as_deref()
                .and_then(|value| retry_after_delay(value, now));
            if let Some(delay) = delay {
                return self.spend_retry(current, Transition::Backoff(delay));
            }
        }

        if (300..400).contains(&status) {
            if self.redirects >= self.policy.max_redirects {
                return Transition::Fatal(FetchError::TooManyRedirects {
                    url: current.to_string(),
                    limit: self.policy.max_redirects,
                });
            }
            let target = response
                .location
                .as_deref()
                .and_then(|location| current.join(location).ok());
            return match target {
                Some(target) => {
                    self.redirects += 1;
                    Transition::RedirectFollow(target)
                }
                None => Transition::Fatal(FetchError::Redirect {
                    url: current.to_string(),
                }),
            };
        }

        if status == 500 {
            return self.spend_retry(current, Transition::Attempt);
        }

        Transition::Success
    }

    fn spend_retry(&mut self, current: &Url, transition: Transition) -> Transition {
        if self.retries >= self.policy.max_retries {
            return Transition::Fatal(FetchError::RetriesExhausted {
                url: current.to_string(),
                retries: self.retries,
            });
        }
        self.retries += 1;
        transition
    }
}

/// How long to wait for a `Retry-After` value.
///
/// Only positive integers are honoured, read as a Unix timestamp in seconds.
/// The wait lasts until that instant plus one minute, and is zero when the
/// instant is more than a minute in the past. Small delta-seconds values
/// therefore land in 1970 and cause no wait at all.
pub fn retry_after_delay(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let secs: i64 = value.trim().parse().ok()?;
    if secs <= 0 {
        return None;
    }
    let until = DateTime::<Utc>::from_timestamp(secs, 0)?;
    let wait = (until - now).checked_add(&TimeDelta::seconds(BACKOFF_SLACK_SECS))?;
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}
