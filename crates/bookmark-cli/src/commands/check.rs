//! Availability check command handler

use anyhow::{Context, Result};

use bookmark_core::{AvailabilityClient, Bookmark, Config};

use crate::output::Output;

/// Look up the closest archived snapshot of `input`
pub fn check(config: &Config, input: &str, timestamp: Option<&str>, output: &Output) -> Result<()> {
    let bookmark = Bookmark::parse(input)?;
    let client = AvailabilityClient::new(config).context("Failed to set up availability check")?;

    let availability = client.check(bookmark.as_str(), timestamp)?;
    output.print_availability(bookmark.as_str(), &availability)
}
