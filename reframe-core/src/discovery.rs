//! File discovery module for selecting the videos of a batch.
//!
//! Inputs are either explicit files, which must carry a supported extension,
//! or directories, whose top level is scanned and filtered by the same
//! allow-list. Subdirectories are never searched.

use crate::config::SUPPORTED_EXTENSIONS;
use crate::error::{CoreError, CoreResult};
use crate::utils::get_filename_safe;

use log::{debug, info, warn};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A video selected for normalization, identified by its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Original file name, used for status lines and output naming.
    pub name: String,
    /// Location of the original on disk.
    pub path: PathBuf,
}

impl SourceFile {
    pub fn from_path(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let name = get_filename_safe(&path)?;
        Ok(Self { name, path })
    }
}

/// Whether `path` has an extension in the allow-list (case-insensitive).
#[must_use]
pub fn is_supported_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// Finds supported video files in the top level of `input_dir`, sorted by path.
///
/// # Examples
///
/// ```rust,no_run
/// use reframe_core::find_processable_files;
/// use std::path::Path;
///
/// match find_processable_files(Path::new("/path/to/videos")) {
///     Ok(files) => println!("Found {} video files", files.len()),
///     Err(e) => println!("Error finding video files: {}", e),
/// }
/// ```
pub fn find_processable_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && is_supported_video(&path)).then_some(path)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        Ok(files)
    }
}

/// Turns user-supplied inputs into the ordered source list of a batch.
///
/// Explicit files outside the allow-list are rejected before any work
/// begins; directories contribute their supported files, and a directory
/// with none is skipped. Two sources with the same file name would deliver
/// to the same output, so that is rejected too. Only an empty selection
/// overall is `NoFilesFound`.
pub fn collect_sources(inputs: &[PathBuf]) -> CoreResult<Vec<SourceFile>> {
    let mut sources = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let found = match find_processable_files(input) {
                Err(CoreError::NoFilesFound) => {
                    warn!("No supported video files in {}, skipping", input.display());
                    continue;
                }
                other => other?,
            };
            info!("Found {} video file(s) in {}", found.len(), input.display());
            for path in found {
                sources.push(SourceFile::from_path(path)?);
            }
        } else if input.is_file() {
            if !is_supported_video(input) {
                return Err(CoreError::UnsupportedInput {
                    path: input.clone(),
                    allowed: SUPPORTED_EXTENSIONS.join(", "),
                });
            }
            sources.push(SourceFile::from_path(input.clone())?);
        } else {
            return Err(CoreError::PathError(format!(
                "Input path does not exist or is not accessible: {}",
                input.display()
            )));
        }
    }

    let mut seen = HashSet::new();
    for source in &sources {
        if !seen.insert(source.name.as_str()) {
            return Err(CoreError::DuplicateSourceName(source.name.clone()));
        }
    }

    if sources.is_empty() {
        return Err(CoreError::NoFilesFound);
    }

    debug!("Collected {} source file(s)", sources.len());
    Ok(sources)
}
