// reframe-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use reframe_core::config::{
    DEFAULT_CRF, DEFAULT_ENCODE_TIMEOUT, DEFAULT_OUTPUT_PREFIX, DEFAULT_PRESET,
    DEFAULT_PROBE_TIMEOUT, DEFAULT_VIDEO_CODEC,
};
use std::path::PathBuf;
use std::time::Duration;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Reframe: normalize videos onto 1080p canvases",
    long_about = "Re-encodes videos into 1920x1080 (landscape) or 1080x1920 (portrait) frames, \
                  keeping the aspect ratio and padding with centered black borders. \
                  Uses ffprobe and ffmpeg via reframe-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to a timestamped file in this directory instead of the console
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalizes video files (or directories of them) into an output directory
    Normalize(NormalizeArgs),
    /// Shows the dimensions, target canvas and padding for one video
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Video files or directories (mp4, mov, avi, mkv)
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Directory where normalized files will be saved
    #[arg(
        short = 'o',
        long = "output",
        value_name = "OUTPUT_DIR",
        env = "REFRAME_OUTPUT_DIR",
        default_value = "."
    )]
    pub output_dir: PathBuf,

    /// Prefix added to each output file name
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_OUTPUT_PREFIX)]
    pub prefix: String,

    /// Constant Rate Factor (0-51, lower is higher quality)
    #[arg(long, value_name = "CRF", default_value_t = DEFAULT_CRF)]
    pub crf: u8,

    /// ffmpeg encoder preset
    #[arg(long, value_name = "PRESET", default_value = DEFAULT_PRESET)]
    pub preset: String,

    /// ffmpeg video codec
    #[arg(long, value_name = "CODEC", default_value = DEFAULT_VIDEO_CODEC)]
    pub codec: String,

    /// Number of files to normalize at the same time
    #[arg(short = 'j', long, value_name = "N", default_value_t = 1)]
    pub jobs: usize,

    /// Time limit for each encode in seconds (0 disables it)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_ENCODE_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Time limit for each ffprobe call in seconds (0 disables it)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_PROBE_TIMEOUT.as_secs())]
    pub probe_timeout: u64,

    /// Base directory for the temporary working directory (defaults to the system temp dir)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Path to the ffmpeg binary
    #[arg(long, value_name = "PATH", env = "REFRAME_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long, value_name = "PATH", env = "REFRAME_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Emit progress and results as JSON lines instead of terminal output
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Video file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Time limit for the ffprobe call in seconds (0 disables it)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_PROBE_TIMEOUT.as_secs())]
    pub probe_timeout: u64,

    /// Path to the ffprobe binary
    #[arg(long, value_name = "PATH", env = "REFRAME_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Converts a seconds flag to a timeout, with 0 meaning no limit.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
