// reframe-cli/src/lib.rs
//
// Library portion of the Reframe CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, NormalizeArgs, ProbeArgs};
pub use commands::normalize::run_normalize;
pub use commands::probe::run_probe;
pub use error::{CliResult, PathContext};
