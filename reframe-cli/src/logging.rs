// ============================================================================
// reframe-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console or File Logging for the CLI
//
// Without `--log-dir`, log records go to the console through env_logger and
// RUST_LOG is honored. With `--log-dir`, reframe-core's log4rs setup writes
// them to `reframe_<timestamp>.log` in that directory instead.

use crate::error::CliResult;

use log::LevelFilter;
use reframe_core::CoreError;
use reframe_core::file_logging::setup_file_logging;

use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Log file path for a run started now.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("reframe_{}.log", get_timestamp()))
}

/// Installs the global logger. Returns the log file path when logging to a file.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Some(log_dir) = log_dir {
        let log_file = log_file_path(log_dir);
        setup_file_logging(&log_file, level).map_err(|e| {
            CoreError::OperationFailed(format!("Failed to set up file logging: {e:#}"))
        })?;
        return Ok(Some(log_file));
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_target(false)
        .try_init()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logger: {e}")))?;
    Ok(None)
}
