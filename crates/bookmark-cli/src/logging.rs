//! Logging setup
//!
//! Off unless `BOOKMARK_LOG` is set. Its value is the level for both crates
//! (e.g. `BOOKMARK_LOG=debug`). Logs go to `log_file` from the config when
//! set, otherwise to stderr.

use std::fs::OpenOptions;
use std::sync::Mutex;

use bookmark_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable enabling logging
const LOG_ENV: &str = "BOOKMARK_LOG";

/// Initialize logging if `BOOKMARK_LOG` is set
pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "bookmark_core={},bookmark_cli={}",
        log_level, log_level
    ));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false);

    // Ignore error if already initialized
    match &config.log_file {
        Some(log_path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };
            let _ = builder.with_writer(Mutex::new(log_file)).try_init();
            info!("logging to {:?}", log_path);
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
