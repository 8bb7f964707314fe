//! Configuration structures and constants for the reframe-core library.
//!
//! This module provides the settings shared by the normalizer and the batch
//! driver: where outputs go, how they are named, how ffmpeg encodes, and how
//! long external tools may run.

mod builder;

use crate::error::{CoreError, CoreResult};
use crate::external::ToolPaths;

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub use builder::CoreConfigBuilder;

// Default constants

/// Marker prefixed to every output file name.
pub const DEFAULT_OUTPUT_PREFIX: &str = "TRT_1080p_";

/// Video codec passed to `-c:v`.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Constant Rate Factor for the video encode.
/// Range: 0-51 for x264, lower is higher quality.
pub const DEFAULT_CRF: u8 = 23;

/// Highest CRF accepted by x264.
pub const MAX_CRF: u8 = 51;

/// Encoder speed preset.
pub const DEFAULT_PRESET: &str = "fast";

/// MIME type reported for delivered artifacts.
pub const OUTPUT_MIME_TYPE: &str = "video/mp4";

/// Extensions accepted as input, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];

/// Wall-clock limit for one ffmpeg encode.
pub const DEFAULT_ENCODE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Wall-clock limit for one ffprobe call.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Prefix of the per-run working directory name.
pub const WORK_DIR_PREFIX: &str = "reframe-";

/// Main configuration structure for the reframe-core library.
///
/// Usually assembled by the CLI through [`CoreConfigBuilder`] and validated
/// once before a batch starts.
///
/// # Examples
///
/// ```rust
/// use reframe_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// let config = CoreConfigBuilder::new()
///     .output_dir(PathBuf::from("/videos/out"))
///     .crf(20)
///     .preset("medium")
///     .jobs(2)
///     .encode_timeout(Some(Duration::from_secs(1800)))
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory where normalized outputs are delivered
    pub output_dir: PathBuf,

    /// Base directory for the per-run working directory
    /// (defaults to the system temporary directory)
    pub work_dir: Option<PathBuf>,

    /// Prefix added to the original file name to form the output name
    pub output_prefix: String,

    /// ffmpeg video codec
    pub video_codec: String,

    /// Constant Rate Factor (0-51)
    pub crf: u8,

    /// ffmpeg encoder preset
    pub preset: String,

    /// Limit for each ffmpeg run; `None` waits indefinitely
    pub encode_timeout: Option<Duration>,

    /// Limit for each ffprobe run; `None` waits indefinitely
    pub probe_timeout: Option<Duration>,

    /// Number of files normalized concurrently (1 = sequential)
    pub jobs: usize,

    /// ffmpeg and ffprobe locations
    pub tools: ToolPaths,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            work_dir: None,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            crf: DEFAULT_CRF,
            preset: DEFAULT_PRESET.to_string(),
            encode_timeout: Some(DEFAULT_ENCODE_TIMEOUT),
            probe_timeout: Some(DEFAULT_PROBE_TIMEOUT),
            jobs: 1,
            tools: ToolPaths::default(),
        }
    }
}

impl CoreConfig {
    /// Default configuration delivering to `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Rejects settings that would make every encode fail or outputs collide.
    pub fn validate(&self) -> CoreResult<()> {
        if self.crf > MAX_CRF {
            return Err(CoreError::Config(format!(
                "CRF must be between 0 and {}, got {}",
                MAX_CRF, self.crf
            )));
        }
        if self.video_codec.trim().is_empty() {
            return Err(CoreError::Config("video codec must not be empty".to_string()));
        }
        if self.preset.trim().is_empty() {
            return Err(CoreError::Config("encoder preset must not be empty".to_string()));
        }
        if self.output_prefix.is_empty() {
            return Err(CoreError::Config("output prefix must not be empty".to_string()));
        }
        if self.output_prefix.contains(['/', '\\']) {
            return Err(CoreError::Config(format!(
                "output prefix '{}' must not contain path separators",
                self.output_prefix
            )));
        }
        if self.jobs == 0 {
            return Err(CoreError::Config("jobs must be at least 1".to_string()));
        }
        if SUPPORTED_EXTENSIONS.is_empty() {
            return Err(CoreError::Config("no supported input extensions".to_string()));
        }
        if let Some(work_dir) = &self.work_dir {
            if is_within(&self.output_dir, work_dir) {
                return Err(CoreError::Config(format!(
                    "output directory {} must not be inside the working directory base {}",
                    self.output_dir.display(),
                    work_dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Output file name for a source file name.
    pub fn output_name_for(&self, source_name: &str) -> String {
        format!("{}{}", self.output_prefix, source_name)
    }
}

/// Lexical containment check on normalized paths.
fn is_within(path: &Path, base: &Path) -> bool {
    let path = normalize_lexically(path);
    let base = normalize_lexically(base);
    path.starts_with(&base)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
