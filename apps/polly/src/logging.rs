//! Tracing setup
//!
//! Without a log file, human-readable logs go to stderr so stdout stays
//! clean for command output. With a log file, logs are written to it as JSON
//! lines alongside the teed command output.

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn filter(debug_enabled: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_enabled {
            EnvFilter::new("info,polly=debug,polly_config=debug,polly_platform=debug")
        } else {
            EnvFilter::new("warn")
        }
    })
}

/// Install the global subscriber
pub fn init_tracing(debug_enabled: bool, log_file: Option<File>) {
    match log_file {
        Some(file) => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(Mutex::new(file))
                .with_env_filter(filter(debug_enabled))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter(debug_enabled))
                .init();
        }
    }
}
