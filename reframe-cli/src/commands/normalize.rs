//! Implementation of the 'normalize' subcommand.
//!
//! Builds the core configuration from CLI arguments, selects the source
//! files, checks for ffmpeg/ffprobe and hands the batch to reframe-core.

use crate::cli::{NormalizeArgs, timeout_from_secs};
use crate::error::{CliResult, PathContext};

use reframe_core::{
    BatchReport, CoreConfig, CoreConfigBuilder, JsonReporter, Normalizer, Reporter,
    SystemCommandRunner, TerminalReporter, ToolPaths, check_dependencies, collect_sources,
    process_batch,
};

use log::{debug, info};

use std::fs;

/// Creates and validates CoreConfig from CLI arguments.
pub fn create_core_config(args: &NormalizeArgs) -> CliResult<CoreConfig> {
    let defaults = ToolPaths::default();
    let tools = ToolPaths::new(
        args.ffmpeg.clone().unwrap_or(defaults.ffmpeg),
        args.ffprobe.clone().unwrap_or(defaults.ffprobe),
    );

    let config = CoreConfigBuilder::new()
        .output_dir(args.output_dir.clone())
        .work_dir(args.work_dir.clone())
        .output_prefix(&args.prefix)
        .video_codec(&args.codec)
        .crf(args.crf)
        .preset(&args.preset)
        .encode_timeout(timeout_from_secs(args.timeout))
        .probe_timeout(timeout_from_secs(args.probe_timeout))
        .jobs(args.jobs)
        .tools(tools)
        .build();

    config.validate()?;
    Ok(config)
}

/// Runs the batch. Per-file failures are in the report, not in the error.
pub fn run_normalize(args: NormalizeArgs) -> CliResult<BatchReport> {
    let config = create_core_config(&args)?;
    debug!("Configuration: {:?}", config);

    let sources = collect_sources(&args.inputs)?;
    info!("Selected {} file(s) for normalization", sources.len());

    check_dependencies(&config.tools)?;
    info!("External dependency check passed.");

    fs::create_dir_all(&config.output_dir)
        .path_context("create output directory", &config.output_dir)?;

    let reporter: Box<dyn Reporter> = if args.json {
        Box::new(JsonReporter::new())
    } else {
        Box::new(TerminalReporter::new())
    };

    let normalizer = Normalizer::new(SystemCommandRunner, config);
    process_batch(&normalizer, &sources, reporter.as_ref())
}
