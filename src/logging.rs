use crate::errors::AppError;
use crate::AppResult;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "pdf2images.log";

/// Sends `tracing` events to the log file, appending across runs.
///
/// `RUST_LOG` takes precedence over the `verbose` flag.
pub fn init_logging(log_file_path: &Path, verbose: bool) -> AppResult<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    let default_level = if verbose { "debug" } else { "info" };
    let default_directive = format!("{}={}", env!("CARGO_CRATE_NAME"), default_level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
        .map_err(|e| AppError::SystemError {
            message: format!("Failed to initialize logging: {}", e),
        })
}
