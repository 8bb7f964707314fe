// ============================================================================
// reframe-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of `CoreConfig`. Every field starts at its default, so
// callers only set what they override. Validation is left to
// `CoreConfig::validate`, which the CLI calls before starting a batch.

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::CoreConfig;
use crate::external::ToolPaths;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use reframe_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .output_dir(PathBuf::from("/path/to/output"))
///     .output_prefix("TRT_1080p_")
///     .video_codec("libx264")
///     .crf(23)
///     .preset("fast")
///     .build();
/// assert_eq!(config.crf, 23);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory successful outputs are delivered to.
    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.config.output_dir = output_dir;
        self
    }

    /// Sets the base directory for the per-run working directory.
    pub fn work_dir(mut self, work_dir: Option<PathBuf>) -> Self {
        self.config.work_dir = work_dir;
        self
    }

    pub fn output_prefix(mut self, prefix: &str) -> Self {
        self.config.output_prefix = prefix.to_string();
        self
    }

    pub fn video_codec(mut self, codec: &str) -> Self {
        self.config.video_codec = codec.to_string();
        self
    }

    /// Sets the Constant Rate Factor (0-51).
    pub fn crf(mut self, crf: u8) -> Self {
        self.config.crf = crf;
        self
    }

    pub fn preset(mut self, preset: &str) -> Self {
        self.config.preset = preset.to_string();
        self
    }

    /// Sets the ffmpeg time limit; `None` disables it.
    pub fn encode_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.encode_timeout = timeout;
        self
    }

    /// Sets the ffprobe time limit; `None` disables it.
    pub fn probe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    /// Sets how many files are normalized at once.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs;
        self
    }

    pub fn tools(mut self, tools: ToolPaths) -> Self {
        self.config.tools = tools;
        self
    }

    /// Builds the CoreConfig instance.
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
