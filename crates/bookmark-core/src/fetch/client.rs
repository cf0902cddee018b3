//! Blocking page fetcher: one GET per attempt, body read and discarded.

use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderName, LOCATION, RETRY_AFTER};
use reqwest::redirect;
use tracing::{debug, info};
use url::Url;

use super::error::FetchError;
use super::policy::{ResponseSummary, RetryPolicy, RetryState, Transition};
use crate::config::Config;

/// Blocks the current thread during a backoff
pub trait Sleep {
    fn sleep(&self, duration: Duration);
}

/// [`Sleep`] backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Settings for the HTTP client and retry policy
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Total timeout of a single attempt
    pub timeout: Duration,
    /// Retry and redirect limits
    pub policy: RetryPolicy,
    /// Let the HTTP client follow redirects before the policy sees them
    pub follow_redirects: bool,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for FetchOptions {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.fetch_timeout(),
            policy: RetryPolicy {
                max_retries: config.max_retries,
                max_redirects: config.max_redirects,
            },
            follow_redirects: config.follow_redirects,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Result of a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// URL of the last request, after any redirects the policy followed
    pub url: Url,
    /// Status of the last response
    pub status: u16,
    /// Retries consumed
    pub retries: u32,
    /// Redirects followed by the policy (not by the client)
    pub redirects: u32,
}

/// Page fetcher with bounded retry
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    sleeper: Box<dyn Sleep>,
}

impl Fetcher {
    /// Build a fetcher and its HTTP client
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let redirects = if options.follow_redirects {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .redirect(redirects)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            policy: options.policy,
            sleeper: Box::new(ThreadSleep),
        })
    }

    /// Replace the sleeper used for `Retry-After` backoff
    pub fn with_sleeper(mut self, sleeper: impl Sleep + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Fetch `url`, retrying and following redirects as the policy dictates.
    pub fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let mut target = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let mut state = RetryState::new(self.policy);

        loop {
            let response = self.attempt(&target)?;
            debug!("{} answered {}", target, response.status);

            match state.next(&target, &response, Utc::now()) {
                Transition::Success => {
                    return Ok(FetchOutcome {
                        url: target,
                        status: response.status,
                        retries: state.retries(),
                        redirects: state.redirects(),
                    });
                }
                Transition::Attempt => {
                    info!(
                        "retrying {} after status {} ({}/{})",
                        target, response.status, state.retries(), self.policy.max_retries
                    );
                }
                Transition::Backoff(delay) => {
                    info!(
                        "{} throttled with status {}, backing off {:?} ({}/{})",
                        target,
                        response.status,
                        delay,
                        state.retries(),
                        self.policy.max_retries
                    );
                    self.sleeper.sleep(delay);
                }
                Transition::RedirectFollow(next) => {
                    info!("following redirect {} -> {}", target, next);
                    target = next;
                }
                Transition::Fatal(err) => return Err(err),
            }
        }
    }

    /// Send one GET and drain the body
    fn attempt(&self, url: &Url) -> Result<ResponseSummary, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let summary = ResponseSummary {
            status: response.status().as_u16(),
            retry_after: header_value(&response, RETRY_AFTER),
            location: header_value(&response, LOCATION),
        };

        let body = response.bytes().map_err(|source| FetchError::ReadBody {
            url: url.to_string(),
            source,
        })?;
        debug!("discarded {} byte body from {}", body.len(), url);

        Ok(summary)
    }
}

fn header_value(response: &Response, name: HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
