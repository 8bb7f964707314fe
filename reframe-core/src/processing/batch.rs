// ============================================================================
// reframe-core/src/processing/batch.rs
// ============================================================================
//
// BATCH DRIVER: Normalize a List of Source Files
//
// For each source, in input order: announce it, copy it into its own slot of
// the working directory, normalize it next to the copy, deliver a successful
// output to the configured output directory, record the result and advance
// progress. A failing file never stops the batch.
//
// With `jobs > 1` files run on a dedicated rayon pool. Results are still
// returned in input order, and the completion counter is advanced together
// with the reporter call under one lock so progress never goes backwards.

use crate::config::WORK_DIR_PREFIX;
use crate::discovery::SourceFile;
use crate::error::{CoreError, CoreResult};
use crate::external::runner::CommandRunner;
use crate::processing::normalize::Normalizer;
use crate::reporting::{BatchStartInfo, FileProgressContext, Reporter};
use crate::results::{BatchProgress, BatchReport, BatchSummary, ConversionResult, Outcome};
use crate::workspace::WorkingDirectory;

use log::{error, info, warn};
use rayon::prelude::*;

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

const DELIVERY_TEMP_PREFIX: &str = ".reframe-partial-";

/// Runs every source through `normalizer` and returns one result per source.
///
/// Only setup problems (output directory, working directory, thread pool)
/// are returned as errors; everything that goes wrong with a single file is
/// recorded in that file's [`ConversionResult`].
pub fn process_batch<R, P>(
    normalizer: &Normalizer<R>,
    sources: &[SourceFile],
    reporter: &P,
) -> CoreResult<BatchReport>
where
    R: CommandRunner,
    P: Reporter + ?Sized,
{
    let config = normalizer.config();
    let batch_start = Instant::now();

    fs::create_dir_all(&config.output_dir)?;
    let work = WorkingDirectory::create(config.work_dir.as_deref(), WORK_DIR_PREFIX)?;

    info!(
        "Normalizing {} file(s) into {} (working directory {})",
        sources.len(),
        config.output_dir.display(),
        work.path().display()
    );
    reporter.batch_started(&BatchStartInfo {
        total_files: sources.len(),
        file_list: sources.iter().map(|s| s.name.clone()).collect(),
        output_dir: config.output_dir.display().to_string(),
    });

    let progress = Mutex::new(BatchProgress::new(sources.len()));
    let run_one = |index: usize, source: &SourceFile| {
        let result = process_file(normalizer, &work, index, sources.len(), source, reporter);
        let mut progress = progress.lock().unwrap_or_else(|e| e.into_inner());
        progress.completed += 1;
        reporter.file_complete(&result, &progress);
        result
    };

    let results: Vec<ConversionResult> = if config.jobs <= 1 || sources.len() <= 1 {
        sources
            .iter()
            .enumerate()
            .map(|(index, source)| run_one(index, source))
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs.min(sources.len()))
            .thread_name(|i| format!("reframe-worker-{i}"))
            .build()
            .map_err(|e| CoreError::OperationFailed(format!("Failed to start worker pool: {e}")))?;
        pool.install(|| {
            sources
                .par_iter()
                .enumerate()
                .map(|(index, source)| run_one(index, source))
                .collect()
        })
    };

    if let Err(e) = work.close() {
        reporter.warning(&e.to_string());
    }

    let summary = BatchSummary::from_results(&results, batch_start.elapsed());
    info!(
        "Batch finished: {} of {} succeeded",
        summary.succeeded, summary.total
    );
    reporter.batch_complete(&summary);

    Ok(BatchReport { results, summary })
}

fn process_file<R, P>(
    normalizer: &Normalizer<R>,
    work: &WorkingDirectory,
    index: usize,
    total: usize,
    source: &SourceFile,
    reporter: &P,
) -> ConversionResult
where
    R: CommandRunner,
    P: Reporter + ?Sized,
{
    let config = normalizer.config();
    let started = Instant::now();
    let output_name = config.output_name_for(&source.name);

    let context = FileProgressContext {
        source_name: source.name.clone(),
        current_file: index + 1,
        total_files: total,
    };
    info!("{}", context.status_line());
    reporter.file_started(&context);

    let outcome = match work.materialize(index, &source.path, &source.name) {
        Err(e) => {
            error!("Could not copy {} into the working directory: {}", source.path.display(), e);
            Outcome::failure("could not read source file")
        }
        Ok(input) => {
            let staged = work.slot(index).join(&output_name);
            match normalizer.normalize(&input, &staged) {
                Ok(()) => {
                    let destination = config.output_dir.join(&output_name);
                    match deliver(&staged, &destination, reporter) {
                        Ok(size) => Outcome::success(destination, size),
                        Err(e) => {
                            error!("Could not deliver {}: {}", destination.display(), e);
                            Outcome::failure("could not save output")
                        }
                    }
                }
                Err(e) => {
                    warn!("{} failed: {}", source.name, e);
                    Outcome::failure(e.short_message())
                }
            }
        }
    };

    ConversionResult {
        source_name: source.name.clone(),
        output_name,
        outcome,
        elapsed: started.elapsed(),
    }
}

/// Copies a finished output to its destination, replacing an older one.
///
/// The copy is written to a hidden temporary file next to the destination
/// and renamed into place, so a failed copy never leaves a truncated output
/// or clobbers the previous one.
fn deliver<P: Reporter + ?Sized>(staged: &Path, destination: &Path, reporter: &P) -> CoreResult<u64> {
    if destination.exists() {
        let message = format!("Overwriting existing output {}", destination.display());
        warn!("{}", message);
        reporter.warning(&message);
    }

    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    let mut partial = tempfile::Builder::new()
        .prefix(DELIVERY_TEMP_PREFIX)
        .tempfile_in(parent)?;
    let size = io::copy(&mut File::open(staged)?, partial.as_file_mut())?;
    partial.as_file().sync_all()?;
    partial.persist(destination).map_err(io::Error::from)?;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::external::ToolPaths;
    use crate::external::mocks::FakeCommandRunner;
    use crate::reporting::{ChannelReporter, NullReporter, ReportEvent};
    use std::sync::mpsc;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        _root: TempDir,
        input_dir: std::path::PathBuf,
        output_dir: std::path::PathBuf,
        work_base: std::path::PathBuf,
    }

    fn fixture() -> Fixture {
        let root = tempdir().unwrap();
        let input_dir = root.path().join("in");
        let output_dir = root.path().join("out");
        let work_base = root.path().join("work");
        fs::create_dir_all(&input_dir).unwrap();
        Fixture {
            input_dir,
            output_dir,
            work_base,
            _root: root,
        }
    }

    fn source(fixture: &Fixture, name: &str) -> SourceFile {
        let path = fixture.input_dir.join(name);
        fs::write(&path, b"source").unwrap();
        SourceFile::from_path(path).unwrap()
    }

    fn normalizer(fixture: &Fixture, jobs: usize) -> Normalizer<FakeCommandRunner> {
        let config = CoreConfig {
            output_dir: fixture.output_dir.clone(),
            work_dir: Some(fixture.work_base.clone()),
            jobs,
            tools: ToolPaths::new("ffmpeg", "ffprobe"),
            ..CoreConfig::default()
        };
        Normalizer::new(FakeCommandRunner::new(), config)
    }

    #[test]
    fn test_success_is_delivered_with_prefix() {
        let fixture = fixture();
        let sources = vec![source(&fixture, "a.mp4")];
        let normalizer = normalizer(&fixture, 1);
        normalizer.runner().expect_probe("a.mp4", 1920, 1080);
        normalizer.runner().expect_encode_success("a.mp4");

        let report = process_batch(&normalizer, &sources, &NullReporter).unwrap();
        let result = &report.results[0];
        assert!(result.is_success());
        assert_eq!(result.output_name, "TRT_1080p_a.mp4");
        assert_eq!(
            result.output_path(),
            Some(&fixture.output_dir.join("TRT_1080p_a.mp4"))
        );
        assert!(fixture.output_dir.join("TRT_1080p_a.mp4").exists());

        // The encoder reads the materialized copy, not the original.
        let encode = &normalizer.runner().encode_calls()[0];
        assert_ne!(encode.value_of("-i"), fixture.input_dir.join("a.mp4").to_str());
    }

    #[test]
    fn test_missing_source_is_a_failure_not_an_error() {
        let fixture = fixture();
        let sources = vec![SourceFile {
            name: "gone.mp4".to_string(),
            path: fixture.input_dir.join("gone.mp4"),
        }];
        let normalizer = normalizer(&fixture, 1);

        let report = process_batch(&normalizer, &sources, &NullReporter).unwrap();
        assert_eq!(report.results[0].failure_reason(), Some("could not read source file"));
        assert!(normalizer.runner().received_calls().is_empty());
    }

    #[test]
    fn test_existing_output_is_replaced_with_warning() {
        let fixture = fixture();
        fs::create_dir_all(&fixture.output_dir).unwrap();
        fs::write(fixture.output_dir.join("TRT_1080p_a.mp4"), b"old").unwrap();
        let sources = vec![source(&fixture, "a.mp4")];
        let normalizer = normalizer(&fixture, 1);
        normalizer.runner().expect_probe("a.mp4", 1920, 1080);
        normalizer.runner().expect_encode_success("a.mp4");

        let (tx, rx) = mpsc::channel();
        let report = process_batch(&normalizer, &sources, &ChannelReporter::new(tx)).unwrap();
        assert!(report.results[0].is_success());
        assert_eq!(
            fs::read(fixture.output_dir.join("TRT_1080p_a.mp4")).unwrap(),
            b"fake video"
        );
        assert!(rx.try_iter().any(|event| matches!(event, ReportEvent::Warning(_))));
    }

    #[test]
    fn test_delivery_failure_is_a_failure_result() {
        let fixture = fixture();
        // A directory squatting on the output name makes the final rename fail.
        fs::create_dir_all(fixture.output_dir.join("TRT_1080p_a.mp4")).unwrap();
        let sources = vec![source(&fixture, "a.mp4")];
        let normalizer = normalizer(&fixture, 1);
        normalizer.runner().expect_probe("a.mp4", 1920, 1080);
        normalizer.runner().expect_encode_success("a.mp4");

        let report = process_batch(&normalizer, &sources, &NullReporter).unwrap();
        assert_eq!(report.results[0].failure_reason(), Some("could not save output"));
        assert_eq!(report.summary.failed, 1);
        assert!(report.summary.delivered.is_empty());

        // Neither the working directory nor a partial copy is left behind.
        assert_eq!(fs::read_dir(&fixture.work_base).unwrap().count(), 0);
        let leftovers: Vec<_> = fs::read_dir(&fixture.output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers, vec!["TRT_1080p_a.mp4".to_string()]);
        assert!(fixture.output_dir.join("TRT_1080p_a.mp4").is_dir());
    }

    #[test]
    fn test_deliver_replaces_previous_output_whole() {
        let dir = tempdir().unwrap();
        let staged = dir.path().join("staged.mp4");
        let destination = dir.path().join("TRT_1080p_clip.mp4");
        fs::write(&staged, b"new output").unwrap();
        fs::write(&destination, b"an older and longer output").unwrap();

        let size = deliver(&staged, &destination, &NullReporter).unwrap();
        assert_eq!(size, 10);
        assert_eq!(fs::read(&destination).unwrap(), b"new output");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let fixture = fixture();
        let normalizer = normalizer(&fixture, 1);
        let report = process_batch(&normalizer, &[], &NullReporter).unwrap();
        assert!(report.results.is_empty());
        assert!(!report.has_failures());
    }
}
