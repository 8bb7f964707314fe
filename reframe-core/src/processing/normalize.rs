// ============================================================================
// reframe-core/src/processing/normalize.rs
// ============================================================================
//
// NORMALIZER: One Source File to One 1080p Canvas
//
// Probe the source, choose the canvas from its orientation, build the
// scale+pad filter and run the encode. The encoder is never started for a
// source whose dimensions could not be read.

use crate::config::CoreConfig;
use crate::error::{ConversionError, ProbeError};
use crate::external::ffmpeg::{EncodeParams, run_encode};
use crate::external::ffprobe_executor::probe_dimensions;
use crate::external::runner::CommandRunner;
use crate::processing::geometry::{FrameLayout, TargetCanvas, VideoDimensions};

use log::{debug, info};

use std::path::Path;

/// Runs the probe and encode steps for single files.
///
/// Holds no per-file state; the same instance may be shared across threads.
pub struct Normalizer<R: CommandRunner> {
    runner: R,
    config: CoreConfig,
}

impl<R: CommandRunner> Normalizer<R> {
    pub fn new(runner: R, config: CoreConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Reads the dimensions of `input` with ffprobe.
    pub fn probe(&self, input: &Path) -> Result<VideoDimensions, ProbeError> {
        probe_dimensions(
            &self.runner,
            &self.config.tools.ffprobe,
            input,
            self.config.probe_timeout,
        )
    }

    /// Encode parameters for `input` on `canvas`.
    pub fn encode_params(&self, input: &Path, output: &Path, canvas: TargetCanvas) -> EncodeParams {
        EncodeParams {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            video_filter: canvas.filter(),
            video_codec: self.config.video_codec.clone(),
            crf: self.config.crf,
            preset: self.config.preset.clone(),
        }
    }

    /// Normalizes `input` into `output`.
    pub fn normalize(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let dimensions = self.probe(input)?;
        let layout = FrameLayout::for_source(dimensions);
        info!(
            "{}: {} -> {}, content {}x{}",
            input.display(),
            dimensions,
            layout.canvas,
            layout.scaled_width,
            layout.scaled_height
        );
        if !layout.is_exact_fit() {
            debug!(
                "Padding l/r {}/{} t/b {}/{}",
                layout.pad_left, layout.pad_right, layout.pad_top, layout.pad_bottom
            );
        }

        let params = self.encode_params(input, output, layout.canvas);
        run_encode(
            &self.runner,
            &self.config.tools.ffmpeg,
            &params,
            self.config.encode_timeout,
        )?;
        Ok(())
    }
}
