//! Progress and status reporting for batch runs.
//!
//! The batch driver talks to a [`Reporter`] passed in by the caller instead
//! of any global UI state. Calls describing file completion are serialized by
//! the driver, so a reporter sees `completed` counts in increasing order even
//! when files are normalized in parallel.

use crate::results::{BatchProgress, BatchSummary, ConversionResult, Outcome};
use crate::utils::{format_bytes, format_elapsed};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use std::time::{SystemTime, UNIX_EPOCH};

/// Batch start metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchStartInfo {
    pub total_files: usize,
    pub file_list: Vec<String>,
    pub output_dir: String,
}

/// Which file of the batch is being worked on (1-based).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileProgressContext {
    pub source_name: String,
    pub current_file: usize,
    pub total_files: usize,
}

impl FileProgressContext {
    /// The per-file status line, e.g. "Processing clip.mp4 (2/5)".
    pub fn status_line(&self) -> String {
        format!(
            "Processing {} ({}/{})",
            self.source_name, self.current_file, self.total_files
        )
    }
}

/// Reporter interface implemented by the terminal, JSON and channel reporters.
pub trait Reporter: Send + Sync {
    fn batch_started(&self, _info: &BatchStartInfo) {}
    fn file_started(&self, _context: &FileProgressContext) {}
    fn file_complete(&self, _result: &ConversionResult, _progress: &BatchProgress) {}
    fn warning(&self, _message: &str) {}
    fn batch_complete(&self, _summary: &BatchSummary) {}
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn batch_started(&self, info: &BatchStartInfo) {
        (**self).batch_started(info)
    }
    fn file_started(&self, context: &FileProgressContext) {
        (**self).file_started(context)
    }
    fn file_complete(&self, result: &ConversionResult, progress: &BatchProgress) {
        (**self).file_complete(result, progress)
    }
    fn warning(&self, message: &str) {
        (**self).warning(message)
    }
    fn batch_complete(&self, summary: &BatchSummary) {
        (**self).batch_complete(summary)
    }
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Human-friendly reporter: a batch progress bar plus one line per file.
pub struct TerminalReporter {
    progress: Mutex<Option<ProgressBar>>,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(None),
        }
    }

    /// Prints through the progress bar when one is active so lines don't tear it.
    fn print_line(&self, line: String) {
        match self.progress.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(pb) => pb.println(line),
                None => println!("{line}"),
            },
            Err(_) => println!("{line}"),
        }
    }

    fn finish_progress(&self) {
        if let Ok(mut guard) = self.progress.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Reporter for TerminalReporter {
    fn batch_started(&self, info: &BatchStartInfo) {
        println!("\n{}", style("BATCH").bold().cyan());
        println!(
            "  Normalizing {} file(s) -> {}",
            info.total_files,
            style(&info.output_dir).bold()
        );
        for (idx, name) in info.file_list.iter().enumerate() {
            println!("  {}. {}", idx + 1, name);
        }
        println!();

        let pb = ProgressBar::new(info.total_files as u64);
        let bar_style = ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} {percent:>3}% | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        pb.set_style(bar_style);
        if let Ok(mut guard) = self.progress.lock() {
            *guard = Some(pb);
        }
    }

    fn file_started(&self, context: &FileProgressContext) {
        let line = context.status_line();
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_message(line.clone());
            }
        }
        self.print_line(format!("{}{}", style("› ").magenta(), line));
    }

    fn file_complete(&self, result: &ConversionResult, progress: &BatchProgress) {
        let line = match &result.outcome {
            Outcome::Success { output_path, size, .. } => format!(
                "  {} {} -> {} ({}, {})",
                style("✓").green().bold(),
                result.source_name,
                style(output_path.display()).green(),
                format_bytes(*size),
                format_elapsed(result.elapsed)
            ),
            Outcome::Failure { reason } => format!(
                "  {} {}: {}",
                style("✗").red().bold(),
                result.source_name,
                style(reason).red()
            ),
        };
        self.print_line(line);

        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_position(progress.completed as u64);
            }
        }
    }

    fn warning(&self, message: &str) {
        self.print_line(style(format!("WARN: {message}")).yellow().bold().to_string());
    }

    fn batch_complete(&self, summary: &BatchSummary) {
        self.finish_progress();
        println!("\n{}", style("BATCH SUMMARY").bold().cyan());
        let counts = format!("{} of {} succeeded", summary.succeeded, summary.total);
        if summary.failed == 0 {
            println!("  {}", style(counts).green().bold());
        } else {
            println!(
                "  {} ({} failed)",
                style(counts).bold(),
                style(summary.failed.to_string()).red().bold()
            );
        }
        println!("  Time: {}", format_elapsed(summary.elapsed));
        for path in &summary.delivered {
            println!("  - {}", path.display());
        }
    }
}

/// JSON-lines reporter for machine consumers.
pub struct JsonReporter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_value(&self, value: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", value);
            let _ = writer.flush();
        }
    }
}

impl Reporter for JsonReporter {
    fn batch_started(&self, info: &BatchStartInfo) {
        self.write_value(json!({
            "type": "batch_started",
            "total_files": info.total_files,
            "files": info.file_list,
            "output_dir": info.output_dir,
            "timestamp": Self::timestamp(),
        }));
    }

    fn file_started(&self, context: &FileProgressContext) {
        self.write_value(json!({
            "type": "file_started",
            "file": context.source_name,
            "current_file": context.current_file,
            "total_files": context.total_files,
            "message": context.status_line(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn file_complete(&self, result: &ConversionResult, progress: &BatchProgress) {
        self.write_value(json!({
            "type": "file_complete",
            "result": result,
            "completed": progress.completed,
            "total": progress.total,
            "fraction": progress.fraction(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn warning(&self, message: &str) {
        self.write_value(json!({
            "type": "warning",
            "message": message,
            "timestamp": Self::timestamp(),
        }));
    }

    fn batch_complete(&self, summary: &BatchSummary) {
        self.write_value(json!({
            "type": "batch_complete",
            "summary": summary,
            "timestamp": Self::timestamp(),
        }));
    }
}

/// Everything a [`ChannelReporter`] forwards.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportEvent {
    BatchStarted(BatchStartInfo),
    FileStarted(FileProgressContext),
    FileComplete {
        result: ConversionResult,
        progress: BatchProgress,
    },
    Warning(String),
    BatchComplete(BatchSummary),
}

/// Forwards every update over an mpsc channel, e.g. to a UI thread.
///
/// A dropped receiver is ignored; the batch keeps running.
pub struct ChannelReporter {
    sender: Sender<ReportEvent>,
}

impl ChannelReporter {
    pub fn new(sender: Sender<ReportEvent>) -> Self {
        Self { sender }
    }

    fn send(&self, event: ReportEvent) {
        let _ = self.sender.send(event);
    }
}

impl Reporter for ChannelReporter {
    fn batch_started(&self, info: &BatchStartInfo) {
        self.send(ReportEvent::BatchStarted(info.clone()));
    }

    fn file_started(&self, context: &FileProgressContext) {
        self.send(ReportEvent::FileStarted(context.clone()));
    }

    fn file_complete(&self, result: &ConversionResult, progress: &BatchProgress) {
        self.send(ReportEvent::FileComplete {
            result: result.clone(),
            progress: *progress,
        });
    }

    fn warning(&self, message: &str) {
        self.send(ReportEvent::Warning(message.to_string()));
    }

    fn batch_complete(&self, summary: &BatchSummary) {
        self.send(ReportEvent::BatchComplete(summary.clone()));
    }
}
