//! Wayback Machine availability lookup
//!
//! Asks the availability endpoint whether an archived snapshot of a URL
//! exists. Without a timestamp the most recent snapshot is returned; with a
//! timestamp (`YYYYMMDDhhmmss`, 1 to 14 digits) the closest one is.
//!
//! See <https://archive.org/help/wayback_api.php>.

use std::fmt;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

/// Errors from the availability lookup
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("invalid timestamp {0:?}: expected 1 to 14 digits (YYYYMMDDhhmmss)")]
    InvalidTimestamp(String),

    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("querying availability for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("availability endpoint answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("decoding availability response for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Closest archived snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub status: String,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (captured {}, status {})",
            self.url, self.timestamp, self.status
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedSnapshots {
    #[serde(default)]
    pub closest: Option<Snapshot>,
}

/// Body returned by the availability endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// The URL as echoed back by the endpoint
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub archived_snapshots: ArchivedSnapshots,
}

impl Availability {
    /// The closest snapshot, if one is available
    pub fn closest(&self) -> Option<&Snapshot> {
        self.archived_snapshots
            .closest
            .as_ref()
            .filter(|snapshot| snapshot.available)
    }
}

/// Check `timestamp` is 1 to 14 ASCII digits
pub fn validate_timestamp(timestamp: &str) -> Result<(), AvailabilityError> {
    let valid = (1..=14).contains(&timestamp.len())
        && timestamp.bytes().all(|b| b.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(AvailabilityError::InvalidTimestamp(timestamp.to_string()))
    }
}

/// Client for the availability endpoint
pub struct AvailabilityClient {
    client: Client,
    endpoint: String,
}

impl AvailabilityClient {
    pub fn new(config: &Config) -> Result<Self, AvailabilityError> {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(AvailabilityError::Client)?;

        Ok(Self {
            client,
            endpoint: config.availability_url.clone(),
        })
    }

    /// Look up the snapshot of `url` closest to `timestamp` (latest if none)
    pub fn check(
        &self,
        url: &str,
        timestamp: Option<&str>,
    ) -> Result<Availability, AvailabilityError> {
        let mut query = vec![("url", url)];
        if let Some(ts) = timestamp {
            validate_timestamp(ts)?;
            query.push(("timestamp", ts));
        }

        debug!("checking availability of {} at {}", url, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .map_err(|source| AvailabilityError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AvailabilityError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Availability>()
            .map_err(|source| AvailabilityError::Decode {
                url: url.to_string(),
                source,
            })
    }
}
