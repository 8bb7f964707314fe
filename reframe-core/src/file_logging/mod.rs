//! File logging through log4rs, used when the CLI is given a log directory.

pub mod setup;

pub use setup::{LOG_PATTERN, setup_file_logging};
