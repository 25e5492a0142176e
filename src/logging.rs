//! Tracing setup. The terminal belongs to the UI, so log lines go to a file
//! in the data directory, or nowhere when there is none.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "COMPOSR_LOG";
pub const LOG_FILE: &str = "composr-tui.log";
const DEFAULT_LOG_FILTER: &str = "composr_tui=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Start logging to `<dir>/composr-tui.log`. Returns the log file path.
pub fn init(dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(dir) = dir else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(io::sink)
            .try_init();
        return Ok(None);
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(Some(path))
}
