//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (-json flag)
//! - Quiet mode for scripting (-quiet flag)

use anyhow::Result;
use bookmark_core::{Availability, Bookmark, FetchOutcome};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print stored URLs, already sorted
    pub fn print_bookmarks(&self, urls: &[&str]) -> Result<()> {
        print_rendered(&self.render_bookmarks(urls)?);
        Ok(())
    }

    /// Report a saved bookmark
    pub fn print_saved(&self, bookmark: &Bookmark, outcome: &FetchOutcome) -> Result<()> {
        print_rendered(&self.render_saved(bookmark, outcome)?);
        Ok(())
    }

    /// Print the result of an availability lookup
    pub fn print_availability(&self, url: &str, availability: &Availability) -> Result<()> {
        print_rendered(&self.render_availability(url, availability)?);
        Ok(())
    }

    fn render_bookmarks(&self, urls: &[&str]) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Human | OutputFormat::Quiet => urls.join("\n"),
            OutputFormat::Json => serde_json::to_string_pretty(urls)?,
        })
    }

    fn render_saved(&self, bookmark: &Bookmark, outcome: &FetchOutcome) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Human => format!("✓ Saved {}", bookmark),
            OutputFormat::Json => serde_json::json!({
                "status": "saved",
                "url": bookmark,
                "http_status": outcome.status,
                "retries": outcome.retries,
            })
            .to_string(),
            OutputFormat::Quiet => String::new(),
        })
    }

    fn render_availability(&self, url: &str, availability: &Availability) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Human => match availability.closest() {
                Some(snapshot) => format!("Closest snapshot: {}", snapshot),
                None => format!("No snapshot available for {}", url),
            },
            OutputFormat::Json => serde_json::to_string_pretty(availability)?,
            OutputFormat::Quiet => availability
                .closest()
                .map(|snapshot| snapshot.url.clone())
                .unwrap_or_default(),
        })
    }
}

/// Print non-empty output followed by a newline
fn print_rendered(text: &str) {
    if !text.is_empty() {
        println!("{}", text);
    }
}
