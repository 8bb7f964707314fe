// ============================================================================
// reframe-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Normalization Pipeline
//
// Errors are split by scope. `CommandError`, `ProbeError`, `EncodeError` and
// `ConversionError` describe the failure of a single file and are recorded in
// that file's result; `CoreError` is reserved for failures that stop a whole
// batch before or around the per-file work.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to run an external command to completion.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed while waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' timed out after {after:?} and was killed")]
    TimedOut { program: String, after: Duration },
}

/// Why the dimensions of a source could not be determined.
///
/// Callers treat every variant the same way; the variants only exist so the
/// log says what went wrong.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("ffprobe could not be run: {0}")]
    Command(#[from] CommandError),

    #[error("ffprobe exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("Failed to parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Video stream is missing width or height")]
    MissingDimensions,

    #[error("Invalid dimensions reported: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },
}

/// Why the encoder did not produce a usable output.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("ffmpeg could not be run: {0}")]
    Command(#[from] CommandError),

    #[error("ffmpeg exited with {status}")]
    Exit { status: String, stderr_tail: String },

    #[error("ffmpeg exited successfully but no output exists at {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Per-file failure of the normalization pipeline.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Could not determine video dimensions: {0}")]
    ProbeFailed(#[from] ProbeError),

    #[error("Encoding failed: {0}")]
    EncodeFailed(#[from] EncodeError),
}

impl ConversionError {
    /// Short, user-facing description without tool diagnostics.
    pub fn short_message(&self) -> &'static str {
        match self {
            ConversionError::ProbeFailed(_) => "could not read video dimensions",
            ConversionError::EncodeFailed(EncodeError::Command(CommandError::TimedOut { .. })) => {
                "encoding timed out"
            }
            ConversionError::EncodeFailed(_) => "encoding failed",
        }
    }
}

/// Batch-level errors for reframe-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Dependency check for '{0}' failed: {1}")]
    DependencyCheck(String, #[source] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Unsupported input '{}': expected one of {allowed}", .path.display())]
    UnsupportedInput { path: PathBuf, allowed: String },

    #[error("Duplicate source file name '{0}' in batch")]
    DuplicateSourceName(String),

    #[error("No processable video files found")]
    NoFilesFound,

    #[error("Working directory error: {0}")]
    WorkingDirectory(String),

    #[error("Probe failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for reframe-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
