// ============================================================================
// reframe-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffprobe and ffmpeg
//
// Everything that leaves the process goes through this module. The prober
// and encoder build their argument lists here and hand them to a
// `CommandRunner`, so tests can swap the real subprocesses for scripted ones.
//
// KEY COMPONENTS:
// - CommandRunner trait with system and fake implementations
// - Dimension probing via ffprobe
// - Normalization encode via ffmpeg
// - Tool path resolution and dependency checking

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- External crate imports ----
use log::{debug, error, warn};

// ---- Standard library imports ----
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Encode parameters and ffmpeg invocation
pub mod ffmpeg;

/// Dimension probing with ffprobe
pub mod ffprobe_executor;

/// Scripted command runner for tests (feature "test-mocks")
pub mod mocks;

/// Subprocess execution behind the `CommandRunner` trait
pub mod runner;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::{EncodeParams, build_encode_command, run_encode};
pub use ffprobe_executor::{build_probe_command, parse_dimensions, probe_dimensions};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemCommandRunner, path_arg};

// ============================================================================
// TOOL PATHS
// ============================================================================

/// Locations of the two external binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }
}

impl Default for ToolPaths {
    /// ffmpeg-sidecar's resolution: next to the current executable if present,
    /// otherwise the bare name looked up on `PATH`.
    fn default() -> Self {
        Self {
            ffmpeg: ffmpeg_sidecar::paths::ffmpeg_path(),
            ffprobe: ffmpeg_sidecar::ffprobe::ffprobe_path(),
        }
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that `program` can be started by running it with `-version`.
///
/// Only startability matters; the exit status is logged but not enforced.
pub fn check_dependency(program: &Path) -> CoreResult<()> {
    let name = program.display().to_string();

    let result = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) => {
            if !status.success() {
                warn!("'{} -version' exited with {}", name, status);
            }
            debug!("Found dependency: {}", name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error!("Dependency '{}' not found.", name);
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            error!("Failed to start dependency check command '{}': {}", name, e);
            Err(CoreError::DependencyCheck(name, e))
        }
    }
}

/// Checks both ffprobe and ffmpeg before any file is touched.
pub fn check_dependencies(tools: &ToolPaths) -> CoreResult<()> {
    check_dependency(&tools.ffprobe)?;
    check_dependency(&tools.ffmpeg)?;
    Ok(())
}
