//! Per-file results and batch-level summaries.

use crate::config::OUTPUT_MIME_TYPE;

use serde::Serialize;

use std::path::PathBuf;
use std::time::Duration;

/// Outcome of normalizing one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Success {
        /// Where the normalized artifact was delivered.
        output_path: PathBuf,
        /// Size of the delivered artifact in bytes.
        size: u64,
        mime_type: &'static str,
    },
    Failure {
        /// Short, user-facing reason.
        reason: String,
    },
}

impl Outcome {
    pub fn success(output_path: PathBuf, size: u64) -> Self {
        Outcome::Success {
            output_path,
            size,
            mime_type: OUTPUT_MIME_TYPE,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Outcome::Failure {
            reason: reason.into(),
        }
    }
}

/// One entry per source file, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub source_name: String,
    pub output_name: String,
    pub outcome: Outcome,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    pub fn output_path(&self) -> Option<&PathBuf> {
        match &self.outcome {
            Outcome::Success { output_path, .. } => Some(output_path),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success { .. } => None,
            Outcome::Failure { reason } => Some(reason),
        }
    }
}

/// Files finished so far out of the batch total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self { completed: 0, total }
    }

    /// Completed share in `[0, 1]`; an empty batch counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.completed.min(self.total) as f64) / (self.total as f64)
        }
    }
}

/// Counts and delivered artifacts for a finished batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub delivered: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn from_results(results: &[ConversionResult], elapsed: Duration) -> Self {
        let delivered: Vec<PathBuf> = results
            .iter()
            .filter_map(|r| r.output_path().cloned())
            .collect();
        Self {
            total: results.len(),
            succeeded: delivered.len(),
            failed: results.len() - delivered.len(),
            elapsed,
            delivered,
        }
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub results: Vec<ConversionResult>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

fn serialize_secs<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
