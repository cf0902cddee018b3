//! bookmark CLI
//!
//! Saves reachable URLs to a flat bookmark file and lists them.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory};

use bookmark_core::{BookmarkStore, Config, FetchOptions, Fetcher, StoreError};

mod cli;
mod commands;
mod logging;
mod output;

use cli::{Cli, Mode};
use output::{Output, OutputFormat};

/// Prefix for error messages on stderr
const PROGRAM: &str = "bookmark";

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let Some(mode) = cli.mode() else {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "a URL is required")
            .exit();
    };

    match run(&cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {}", PROGRAM, render_error(&err));
            if let Some(hint) = err
                .downcast_ref::<StoreError>()
                .and_then(StoreError::recovery_suggestion)
            {
                eprintln!("{}: {}", PROGRAM, hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, mode: Mode) -> Result<()> {
    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(ref file) = cli.file {
        config.bookmark_file = file.clone();
    }

    logging::init(&config);
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match mode {
        Mode::List => {
            let store = BookmarkStore::load(&config.bookmark_file)?;
            commands::list::list(&store, &output)
        }
        Mode::Add(url) => {
            let mut store = BookmarkStore::load(&config.bookmark_file)?;
            let fetcher = Fetcher::new(&FetchOptions::from(&config))?;
            commands::add::add(&mut store, &fetcher, &url, &output)
        }
        Mode::Check { url, timestamp } => {
            commands::check::check(&config, &url, timestamp.as_deref(), &output)
        }
    }
}

/// Join an error with its causes, skipping causes already in the message
fn render_error(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}
