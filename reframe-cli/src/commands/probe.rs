//! Implementation of the 'probe' subcommand.
//!
//! Reads one file's dimensions and shows where it would land: the chosen
//! canvas, the scaled content size and the padding on each side.

use crate::cli::{ProbeArgs, timeout_from_secs};
use crate::error::{CliResult, PathContext};

use reframe_core::external::probe_dimensions;
use reframe_core::{
    CoreError, FrameLayout, SystemCommandRunner, ToolPaths, VideoDimensions, check_dependency,
};

use console::style;
use serde_json::json;

use std::path::Path;

/// Probes the file and prints the layout report.
pub fn run_probe(args: ProbeArgs) -> CliResult<()> {
    if !args.file.is_file() {
        return Err(CoreError::PathError(format!(
            "Input file does not exist: {}",
            args.file.display()
        )));
    }

    let ffprobe = args
        .ffprobe
        .clone()
        .unwrap_or_else(|| ToolPaths::default().ffprobe);
    check_dependency(&ffprobe)?;

    let dimensions = probe_dimensions(
        &SystemCommandRunner,
        &ffprobe,
        &args.file,
        timeout_from_secs(args.probe_timeout),
    )
    .path_context("probe", &args.file)?;
    let layout = FrameLayout::for_source(dimensions);

    if args.json {
        println!("{}", probe_json(&args.file, dimensions, &layout));
    } else {
        print!("{}", probe_text(&args.file, dimensions, &layout));
    }
    Ok(())
}

pub fn probe_json(file: &Path, dimensions: VideoDimensions, layout: &FrameLayout) -> serde_json::Value {
    json!({
        "file": file.display().to_string(),
        "source": dimensions,
        "canvas": layout.canvas,
        "layout": layout,
        "filter": layout.canvas.filter(),
    })
}

pub fn probe_text(file: &Path, dimensions: VideoDimensions, layout: &FrameLayout) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style(file.display()).bold()));
    out.push_str(&format!("  {:<9} {}\n", "Source:", dimensions));
    out.push_str(&format!("  {:<9} {}\n", "Canvas:", layout.canvas));
    out.push_str(&format!(
        "  {:<9} {}x{} (scale {:.3})\n",
        "Content:",
        layout.scaled_width,
        layout.scaled_height,
        layout.scale_factor(dimensions)
    ));
    if layout.is_exact_fit() {
        out.push_str(&format!("  {:<9} none\n", "Padding:"));
    } else {
        out.push_str(&format!(
            "  {:<9} left {} right {} top {} bottom {}\n",
            "Padding:", layout.pad_left, layout.pad_right, layout.pad_top, layout.pad_bottom
        ));
    }
    out.push_str(&format!("  {:<9} {}\n", "Filter:", layout.canvas.filter()));
    out
}
