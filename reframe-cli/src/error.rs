// ============================================================================
// reframe-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and path context for CLI-only steps
//
// The CLI reuses reframe-core's `CoreError`. Steps the CLI performs itself
// (creating the output directory, probing a single file) name the path they
// were working on, so the one-line error on stderr is actionable.

use reframe_core::{CoreError, CoreResult};

use std::path::Path;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Attaches "Failed to <action> '<path>'" to an error.
pub trait PathContext<T> {
    fn path_context(self, action: &str, path: &Path) -> CliResult<T>;
}

impl<T, E> PathContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn path_context(self, action: &str, path: &Path) -> CliResult<T> {
        self.map_err(|e| {
            let cause: CoreError = e.into();
            CoreError::OperationFailed(format!(
                "Failed to {} '{}': {}",
                action,
                path.display(),
                cause
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reframe_core::ProbeError;
    use std::io;

    #[test]
    fn test_io_error_names_action_and_path() {
        let result: Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = result
            .path_context("create output directory", Path::new("/out"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create output directory '/out': IO error: denied"
        );
    }

    #[test]
    fn test_probe_error_keeps_cause() {
        let result: Result<(), ProbeError> = Err(ProbeError::NoVideoStream);
        let err = result.path_context("probe", Path::new("clip.mp4")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to probe 'clip.mp4': Probe failed: "));
    }

    #[test]
    fn test_ok_passes_through() {
        let ok: Result<u8, io::Error> = Ok(7);
        assert_eq!(ok.path_context("read", Path::new("x")).unwrap(), 7);
    }
}
