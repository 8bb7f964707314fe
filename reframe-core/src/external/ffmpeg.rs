//! FFmpeg command building and execution for the normalization encode.
//!
//! The encode applies the scale+pad filter, re-encodes video with a
//! constant-quality codec and stream-copies the audio unchanged.

use crate::error::EncodeError;
use crate::external::runner::{CommandRunner, CommandSpec, path_arg};

use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, error, info, warn};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Number of stderr lines kept with an encode failure.
const STDERR_TAIL_LINES: usize = 12;

/// Parameters required for one normalization encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParams {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub video_filter: String,
    pub video_codec: String,
    pub crf: u8,
    pub preset: String,
}

/// Builds the encode command using ffmpeg-sidecar's builder.
///
/// `-y` is always passed so re-running onto an existing output replaces it.
pub fn build_encode_command(ffmpeg: &Path, params: &EncodeParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new_with_path(ffmpeg);
    cmd.hide_banner();
    cmd.overwrite();
    cmd.input(path_arg(&params.input_path));
    cmd.args(["-vf", params.video_filter.as_str()]);
    cmd.args(["-c:v", params.video_codec.as_str()]);
    cmd.args(["-crf", &params.crf.to_string()]);
    cmd.args(["-preset", params.preset.as_str()]);
    // Audio is never re-encoded; an incompatible source codec fails the encode.
    cmd.args(["-c:a", "copy"]);
    cmd.output(path_arg(&params.output_path));
    cmd
}

/// Runs the encode and verifies that an output file was produced.
///
/// On any failure a partial output at `params.output_path` is removed.
pub fn run_encode<R: CommandRunner + ?Sized>(
    runner: &R,
    ffmpeg: &Path,
    params: &EncodeParams,
    timeout: Option<Duration>,
) -> Result<(), EncodeError> {
    info!(
        "Starting encode: {} -> {}",
        params.input_path.display(),
        params.output_path.display()
    );

    let spec = CommandSpec::from_ffmpeg(build_encode_command(ffmpeg, params)).timeout(timeout);
    debug!("FFmpeg command: {}", spec.to_command_line());

    let output = match runner.run(&spec) {
        Ok(output) => output,
        Err(e) => {
            error!("ffmpeg could not complete for {}: {}", params.input_path.display(), e);
            remove_partial_output(&params.output_path);
            return Err(e.into());
        }
    };

    if !output.success() {
        let stderr_tail = output.stderr_tail(STDERR_TAIL_LINES);
        error!(
            "ffmpeg encode failed for {} ({}):\n{}",
            params.input_path.display(),
            output.status_label(),
            stderr_tail
        );
        remove_partial_output(&params.output_path);
        return Err(EncodeError::Exit {
            status: output.status_label(),
            stderr_tail,
        });
    }

    let produced = fs::metadata(&params.output_path)
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !produced {
        error!(
            "ffmpeg reported success but {} does not exist",
            params.output_path.display()
        );
        return Err(EncodeError::MissingOutput(params.output_path.clone()));
    }

    debug!("Encode finished: {}", params.output_path.display());
    Ok(())
}

fn remove_partial_output(path: &Path) {
    if path.exists() {
        match fs::remove_file(path) {
            Ok(()) => debug!("Removed partial output {}", path.display()),
            Err(e) => warn!("Failed to remove partial output {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{FakeCommandRunner, FakeOutcome};
    use crate::processing::geometry::TargetCanvas;
    use tempfile::tempdir;

    fn params(dir: &Path) -> EncodeParams {
        EncodeParams {
            input_path: dir.join("clip.mov"),
            output_path: dir.join("TRT_1080p_clip.mov"),
            video_filter: TargetCanvas::Landscape.filter(),
            video_codec: "libx264".to_string(),
            crf: 23,
            preset: "fast".to_string(),
        }
    }

    #[test]
    fn test_encode_command_arguments() {
        let dir = tempdir().unwrap();
        let params = params(dir.path());
        let spec = CommandSpec::from_ffmpeg(build_encode_command(Path::new("ffmpeg"), &params));

        assert_eq!(spec.value_of("-i"), Some(params.input_path.to_str().unwrap()));
        assert_eq!(spec.value_of("-vf"), Some(params.video_filter.as_str()));
        assert_eq!(spec.value_of("-c:v"), Some("libx264"));
        assert_eq!(spec.value_of("-crf"), Some("23"));
        assert_eq!(spec.value_of("-preset"), Some("fast"));
        assert_eq!(spec.value_of("-c:a"), Some("copy"));
        assert!(spec.args.iter().any(|a| a == "-y"));
        assert_eq!(spec.args.last().map(String::as_str), params.output_path.to_str());

        // Output options follow the input.
        let input_idx = spec.args.iter().position(|a| a == "-i").unwrap();
        let filter_idx = spec.args.iter().position(|a| a == "-vf").unwrap();
        assert!(input_idx < filter_idx);
    }

    #[test]
    fn test_encode_command_guards_dash_paths() {
        let params = EncodeParams {
            input_path: PathBuf::from("-in/clip.mov"),
            output_path: PathBuf::from("-out/TRT_1080p_clip.mov"),
            ..params(Path::new("/unused"))
        };
        let spec = CommandSpec::from_ffmpeg(build_encode_command(Path::new("ffmpeg"), &params));
        assert_eq!(spec.value_of("-i"), Some("./-in/clip.mov"));
        assert_eq!(spec.args.last().map(String::as_str), Some("./-out/TRT_1080p_clip.mov"));
    }

    #[test]
    fn test_run_encode_success_requires_output() {
        let dir = tempdir().unwrap();
        let params = params(dir.path());

        let runner = FakeCommandRunner::new();
        runner.expect_encode_success("clip.mov");
        run_encode(&runner, Path::new("ffmpeg"), &params, None).unwrap();
        assert!(params.output_path.exists());

        // Exit 0 without an output file is still a failure.
        fs::remove_file(&params.output_path).unwrap();
        runner.add_expectation(
            &["-vf"],
            FakeOutcome::Exit { code: 0, stdout: String::new(), stderr: String::new() },
            false,
        );
        let err = run_encode(&runner, Path::new("ffmpeg"), &params, None).unwrap_err();
        assert!(matches!(err, EncodeError::MissingOutput(_)));
    }

    #[test]
    fn test_run_encode_failure_removes_partial_output() {
        let dir = tempdir().unwrap();
        let params = params(dir.path());

        let runner = FakeCommandRunner::new();
        runner.expect_encode_failure(
            "clip.mov",
            1,
            "[mp4 @ 0x1] Could not find tag for codec pcm_s16be in stream #1",
            true,
        );
        let err = run_encode(&runner, Path::new("ffmpeg"), &params, None).unwrap_err();
        match err {
            EncodeError::Exit { status, stderr_tail } => {
                assert_eq!(status, "exit code 1");
                assert!(stderr_tail.contains("pcm_s16be"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!params.output_path.exists());
    }

    #[test]
    fn test_run_encode_timeout() {
        let dir = tempdir().unwrap();
        let params = params(dir.path());

        let runner = FakeCommandRunner::new();
        runner.add_expectation(&["-vf"], FakeOutcome::TimedOut, true);
        let err = run_encode(&runner, Path::new("ffmpeg"), &params, Some(Duration::from_secs(1)))
            .unwrap_err();
        assert!(matches!(err, EncodeError::Command(_)));
        assert!(!params.output_path.exists());
        assert_eq!(runner.received_calls()[0].timeout, Some(Duration::from_secs(1)));
    }
}
