//! Command-line arguments
//!
//! The surface is flag-based rather than subcommand-based:
//!
//! ```text
//! bookmark <url>                      save a URL
//! bookmark -list                      list saved URLs
//! bookmark -check [-timestamp TS] <url>
//! ```
//!
//! Long flags may be written with one dash (`-list`) or two (`--list`).

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Long flag names accepted with a single leading dash
const LONG_FLAGS: &[&str] = &[
    "list",
    "check",
    "timestamp",
    "json",
    "quiet",
    "file",
    "config",
    "help",
    "version",
];

#[derive(Parser, Debug)]
#[command(name = "bookmark")]
#[command(about = "Save reachable URLs to a flat bookmark list")]
#[command(override_usage = "bookmark [-list] [url]\n       bookmark -check [-timestamp TS] <url>")]
#[command(version)]
pub struct Cli {
    /// List bookmarks
    #[arg(long, conflicts_with_all = ["url", "check"])]
    pub list: bool,

    /// Look up the closest archived snapshot instead of saving
    #[arg(long, requires = "url")]
    pub check: bool,

    /// Snapshot timestamp for -check (YYYYMMDDhhmmss, 1-14 digits)
    #[arg(long, value_name = "TS", requires = "check")]
    pub timestamp: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Bookmark file (default: $HOME/.bookmark)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Config file (default: ~/.config/bookmark/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// URL to save
    #[arg(required_unless_present = "list")]
    pub url: Option<String>,
}

/// What an invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Add(String),
    Check {
        url: String,
        timestamp: Option<String>,
    },
}

impl Cli {
    /// Parse process arguments, accepting single-dash long flags
    pub fn parse_args() -> Self {
        Self::parse_from(expand_single_dash_flags(std::env::args_os()))
    }

    /// Resolve the mode, or `None` when no URL was given outside list mode
    pub fn mode(&self) -> Option<Mode> {
        if self.list {
            return Some(Mode::List);
        }
        let url = self.url.clone()?;
        if self.check {
            Some(Mode::Check {
                url,
                timestamp: self.timestamp.clone(),
            })
        } else {
            Some(Mode::Add(url))
        }
    }
}

/// Rewrite `-list` style arguments to `--list` so clap sees long flags.
///
/// Only known long flag names are rewritten, with or without an `=value`
/// suffix, and nothing after a `--` terminator is touched.
pub fn expand_single_dash_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut terminated = false;
    args.into_iter()
        .map(|arg| {
            if terminated {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                terminated = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
