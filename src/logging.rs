//! Logging setup for Attika.
//!
//! The store only emits `tracing` events; it makes no logging policy
//! decisions beyond that. An embedding application can install its own
//! subscriber, or call [`init`] with the loaded configuration to get
//! console output plus an optional log file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{AttikaError, Result};

/// Default filter directive for a configured level. Unknown levels fall
/// back to `info`.
fn level_directive(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Install the global subscriber per the logging configuration.
///
/// Console output is always on. When `config.file` is set, events are also
/// appended to that file (its parent directory is created as needed).
/// `RUST_LOG`, when present, takes precedence over the configured level.
/// Calling this when a subscriber is already installed is an error, not a
/// panic.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(&config.level)));

    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    let file_layer = match &config.file {
        Some(file) => {
            if let Some(parent) = Path::new(file).parent() {
                if !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            let sink = OpenOptions::new().create(true).append(true).open(file)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(sink)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| AttikaError::Validation(format!("logging init failed: {e}")))
}
