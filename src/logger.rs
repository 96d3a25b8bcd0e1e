//! Debug logging support for replace-tree
//!
//! When debug mode is enabled (config, `--debug`, or `REPLACE_TREE_LOG`), engine
//! events are written to `replace-tree.log` in the configured log directory,
//! falling back to ~/.replace-tree.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "REPLACE_TREE_LOG";

const LOG_FILE_NAME: &str = "replace-tree.log";
const DEFAULT_FILTER: &str = "replace_tree=debug";

/// Initialize the debug logging system
///
/// Returns the path to the log file, or None if logging is not enabled or
/// the log file could not be opened.
pub fn init_debug_logging(debug_enabled: bool, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let env_filter = std::env::var(LOG_ENV).ok();
    if !debug_enabled && env_filter.is_none() {
        return Ok(None);
    }

    let log_dir = match log_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_log_dir()?,
    };

    if let Err(e) = fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))
    {
        // Logging must never break a run.
        eprintln!("Warning: Could not create log file: {:#}", e);
        return Ok(None);
    }

    let filter = match env_filter {
        Some(directive) => EnvFilter::try_new(&directive)
            .with_context(|| format!("Invalid {} filter: {}", LOG_ENV, directive))?,
        None => EnvFilter::new(DEFAULT_FILTER),
    };

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(&log_dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return Ok(None);
        }
    };
    let subscriber = registry()
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(Some(log_dir.join(LOG_FILE_NAME)))
}

/// Default directory for the log file: ~/.replace-tree
pub fn default_log_dir() -> Result<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home_dir.join(".replace-tree"))
}
