//! FFprobe integration for reading source video dimensions.
//!
//! Only the first video stream's width and height are requested, as JSON, so
//! the output stays small and the parse stays strict.

use crate::error::ProbeError;
use crate::external::runner::{CommandRunner, CommandSpec, path_arg};
use crate::processing::geometry::VideoDimensions;

use log::{debug, error};
use serde::Deserialize;

use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<i64>,
    height: Option<i64>,
}

/// Builds `ffprobe -v error -select_streams v:0 -show_entries stream=width,height -of json <input>`.
pub fn build_probe_command(ffprobe: &Path, input_path: &Path, timeout: Option<Duration>) -> CommandSpec {
    CommandSpec::new(ffprobe)
        .args(["-v", "error"])
        .args(["-select_streams", "v:0"])
        .args(["-show_entries", "stream=width,height"])
        .args(["-of", "json"])
        .arg(path_arg(input_path))
        .timeout(timeout)
}

/// Extracts the first stream's dimensions from ffprobe's JSON output.
pub fn parse_dimensions(stdout: &[u8]) -> Result<VideoDimensions, ProbeError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)?;
    let stream = output.streams.first().ok_or(ProbeError::NoVideoStream)?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(ProbeError::MissingDimensions),
    };

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => {
            VideoDimensions::new(w, h).ok_or(ProbeError::InvalidDimensions { width, height })
        }
        _ => Err(ProbeError::InvalidDimensions { width, height }),
    }
}

/// Runs ffprobe on `input_path` and returns its video dimensions.
pub fn probe_dimensions<R: CommandRunner + ?Sized>(
    runner: &R,
    ffprobe: &Path,
    input_path: &Path,
    timeout: Option<Duration>,
) -> Result<VideoDimensions, ProbeError> {
    debug!("Running ffprobe for dimensions on: {}", input_path.display());

    let spec = build_probe_command(ffprobe, input_path, timeout);
    let output = runner.run(&spec).map_err(|e| {
        error!("ffprobe could not be run for {}: {}", input_path.display(), e);
        ProbeError::from(e)
    })?;

    if !output.success() {
        let stderr = output.stderr_lossy();
        error!(
            "ffprobe failed for {} ({}): {}",
            input_path.display(),
            output.status_label(),
            stderr
        );
        return Err(ProbeError::Exit {
            status: output.status_label(),
            stderr,
        });
    }

    let dimensions = parse_dimensions(&output.stdout).map_err(|e| {
        error!("Unusable ffprobe output for {}: {}", input_path.display(), e);
        e
    })?;
    debug!("{} is {}", input_path.display(), dimensions);
    Ok(dimensions)
}
