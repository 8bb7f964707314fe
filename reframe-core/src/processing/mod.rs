//! Core normalization logic and batch orchestration.
//!
//! Geometry decides where a source lands on its canvas, the normalizer turns
//! one file into one output, and the batch driver runs many files with
//! progress reporting.

/// Canvas selection and scale+pad layout
pub mod geometry;

/// Probe and encode for a single file
pub mod normalize;

/// Ordered, failure-isolated processing of many files
pub mod batch;

pub use batch::process_batch;
pub use geometry::{FrameLayout, TargetCanvas, VideoDimensions};
pub use normalize::Normalizer;
