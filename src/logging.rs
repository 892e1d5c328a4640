use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
const DEFAULT_LEVEL: &str = "info";

/// Filter directive from `LOG_LEVEL`; accepts `DEBUG`, `WARNING`, `CRITICAL` and friends.
fn level_directive(raw: Option<String>) -> String {
    let level = raw
        .map(|level| level.trim().to_ascii_lowercase())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    match level.as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        _ => level,
    }
}

/// Logs to stderr at `LOG_LEVEL`, or appends everything from `debug` up to `log_file`.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("debug"))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| anyhow::anyhow!("Failed to initialize logging: {err}"))
        }
        None => {
            let directive = level_directive(std::env::var(LOG_LEVEL_ENV).ok());
            let filter = EnvFilter::try_new(&directive)
                .with_context(|| format!("Invalid {LOG_LEVEL_ENV} '{directive}'"))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init()
                .map_err(|err| anyhow::anyhow!("Failed to initialize logging: {err}"))
        }
    }
}
