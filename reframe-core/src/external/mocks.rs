// reframe-core/src/external/mocks.rs

// --- Scripted CommandRunner (for testing) ---
//
// Lets tests exercise the prober, normalizer and batch driver without real
// ffprobe/ffmpeg binaries. Each expectation is a set of argument patterns and
// a canned outcome; the first unconsumed expectation whose patterns all match
// the invoked command answers it.

// Compiled for this crate's own tests, and for other crates only with the
// "test-mocks" feature.
#![cfg(any(test, feature = "test-mocks"))]

use super::runner::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::CommandError;

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Canned result for a matched invocation.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    /// The command ran and exited with `code`.
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The command could not be started.
    SpawnFailure,
    /// The command hit its timeout.
    TimedOut,
}

/// An expected command and the outcome it produces.
#[derive(Debug, Clone)]
pub struct FakeExpectation {
    /// Every pattern must be a substring of at least one argument.
    pub patterns: Vec<String>,
    pub outcome: FakeOutcome,
    /// Create an empty file at the last argument (the output path) on match.
    pub create_output: bool,
}

impl FakeExpectation {
    fn matches(&self, spec: &CommandSpec) -> bool {
        self.patterns
            .iter()
            .all(|pattern| spec.args.iter().any(|arg| arg.contains(pattern.as_str())))
    }
}

/// Builds the JSON ffprobe prints for `-show_entries stream=width,height -of json`.
pub fn ffprobe_json(width: i64, height: i64) -> String {
    format!(
        "{{\n    \"programs\": [],\n    \"streams\": [\n        {{\n            \"width\": {width},\n            \"height\": {height}\n        }}\n    ]\n}}\n"
    )
}

/// `CommandRunner` that answers from a list of expectations and records calls.
#[derive(Debug, Default)]
pub struct FakeCommandRunner {
    expectations: Mutex<Vec<FakeExpectation>>,
    received_calls: Mutex<Vec<CommandSpec>>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(&self, patterns: &[&str], outcome: FakeOutcome, create_output: bool) {
        self.expectations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(FakeExpectation {
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
                outcome,
                create_output,
            });
    }

    /// ffprobe for an input whose path contains `file_hint` reports `width`x`height`.
    pub fn expect_probe(&self, file_hint: &str, width: i64, height: i64) {
        self.add_expectation(
            &["stream=width,height", file_hint],
            FakeOutcome::Exit {
                code: 0,
                stdout: ffprobe_json(width, height),
                stderr: String::new(),
            },
            false,
        );
    }

    /// ffprobe for `file_hint` prints `stdout` and exits with `code`.
    pub fn expect_probe_output(&self, file_hint: &str, code: i32, stdout: &str, stderr: &str) {
        self.add_expectation(
            &["stream=width,height", file_hint],
            FakeOutcome::Exit {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
            false,
        );
    }

    /// ffmpeg for `file_hint` succeeds and leaves an output file behind.
    pub fn expect_encode_success(&self, file_hint: &str) {
        self.add_expectation(
            &["-vf", file_hint],
            FakeOutcome::Exit {
                code: 0,
                stdout: String::new(),
                stderr: String::new(),
            },
            true,
        );
    }

    /// ffmpeg for `file_hint` exits with `code`, optionally leaving a partial file.
    pub fn expect_encode_failure(&self, file_hint: &str, code: i32, stderr: &str, partial: bool) {
        self.add_expectation(
            &["-vf", file_hint],
            FakeOutcome::Exit {
                code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
            partial,
        );
    }

    pub fn received_calls(&self) -> Vec<CommandSpec> {
        self.received_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of recorded calls with an argument containing `pattern`.
    pub fn count_calls_matching(&self, pattern: &str) -> usize {
        self.received_calls()
            .iter()
            .filter(|spec| spec.args.iter().any(|arg| arg.contains(pattern)))
            .count()
    }

    pub fn encode_calls(&self) -> Vec<CommandSpec> {
        self.received_calls()
            .into_iter()
            .filter(|spec| spec.args.iter().any(|arg| arg == "-vf"))
            .collect()
    }

    pub fn remaining_expectations(&self) -> usize {
        self.expectations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.received_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(spec.clone());

        let expectation = {
            let mut expectations = self.expectations.lock().unwrap_or_else(|e| e.into_inner());
            expectations
                .iter()
                .position(|exp| exp.matches(spec))
                .map(|index| expectations.remove(index))
        };

        let Some(expectation) = expectation else {
            log::error!(
                "FakeCommandRunner: no expectation for command: {}",
                spec.to_command_line()
            );
            return Err(CommandError::Spawn {
                program: spec.display_name(),
                source: io::Error::new(io::ErrorKind::NotFound, "no matching expectation"),
            });
        };

        log::debug!(
            "FakeCommandRunner: matched expectation {:?}",
            expectation.patterns
        );

        if expectation.create_output {
            if let Some(output) = spec.args.last() {
                let output = PathBuf::from(output);
                if let Some(parent) = output.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                if let Err(e) = std::fs::write(&output, b"fake video") {
                    log::error!(
                        "FakeCommandRunner failed to create output {}: {}",
                        output.display(),
                        e
                    );
                }
            }
        }

        match expectation.outcome {
            FakeOutcome::Exit {
                code,
                stdout,
                stderr,
            } => Ok(CommandOutput {
                exit_code: Some(code),
                stdout: stdout.into_bytes(),
                stderr: stderr.into_bytes(),
            }),
            FakeOutcome::SpawnFailure => Err(CommandError::Spawn {
                program: spec.display_name(),
                source: io::Error::new(io::ErrorKind::NotFound, "simulated spawn failure"),
            }),
            FakeOutcome::TimedOut => Err(CommandError::TimedOut {
                program: spec.display_name(),
                after: spec.timeout.unwrap_or(Duration::ZERO),
            }),
        }
    }
}
