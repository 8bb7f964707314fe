//! Core library for normalizing videos onto fixed 1080p canvases using ffmpeg and ffprobe.
//!
//! Each source is probed for its dimensions, assigned a landscape (1920x1080)
//! or portrait (1080x1920) canvas, scaled to fit with its aspect ratio kept,
//! padded with centered black borders, and re-encoded. Batches report
//! per-file results and progress through a caller-supplied [`Reporter`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use reframe_core::{
//!     CoreConfig, Normalizer, SystemCommandRunner, TerminalReporter, check_dependencies,
//!     collect_sources, process_batch,
//! };
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(PathBuf::from("/path/to/output"));
//! config.validate().unwrap();
//! check_dependencies(&config.tools).unwrap();
//!
//! let sources = collect_sources(&[PathBuf::from("/path/to/videos")]).unwrap();
//! let normalizer = Normalizer::new(SystemCommandRunner, config);
//! let report = process_batch(&normalizer, &sources, &TerminalReporter::new()).unwrap();
//!
//! for result in &report.results {
//!     println!("{}: {:?}", result.source_name, result.outcome);
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod processing;
pub mod reporting;
pub mod results;
pub mod utils;
pub mod workspace;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::{SourceFile, collect_sources, find_processable_files, is_supported_video};
pub use error::{CommandError, ConversionError, CoreError, CoreResult, EncodeError, ProbeError};
pub use external::{
    CommandRunner, SystemCommandRunner, ToolPaths, check_dependencies, check_dependency,
};
pub use processing::{
    FrameLayout, Normalizer, TargetCanvas, VideoDimensions, process_batch,
};
pub use reporting::{
    ChannelReporter, JsonReporter, NullReporter, ReportEvent, Reporter, TerminalReporter,
};
pub use results::{BatchProgress, BatchReport, BatchSummary, ConversionResult, Outcome};
pub use utils::{format_bytes, format_duration, format_elapsed};
pub use workspace::WorkingDirectory;
