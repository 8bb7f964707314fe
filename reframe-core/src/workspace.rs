//! Scoped working directory for a batch run.
//!
//! Every source file is copied into its own numbered slot so equal names
//! never collide, and the encoder writes its output next to that copy. The
//! whole tree is removed when the `WorkingDirectory` is dropped, whether the
//! batch finished, returned early, or panicked.

use crate::error::{CoreError, CoreResult};

use log::{debug, warn};
use tempfile::{Builder as TempFileBuilder, TempDir};

use std::fs;
use std::path::{Path, PathBuf};

/// Owns the per-run scratch directory. Auto-cleaned when dropped.
#[derive(Debug)]
pub struct WorkingDirectory {
    dir: TempDir,
}

impl WorkingDirectory {
    /// Creates `<base>/<prefix>XXXXXX`, defaulting `base` to the system temp dir.
    pub fn create(base: Option<&Path>, prefix: &str) -> CoreResult<Self> {
        let mut builder = TempFileBuilder::new();
        builder.prefix(prefix);

        let dir = match base {
            Some(base) => {
                fs::create_dir_all(base).map_err(|e| {
                    CoreError::WorkingDirectory(format!(
                        "cannot create base directory {}: {}",
                        base.display(),
                        e
                    ))
                })?;
                builder.tempdir_in(base)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| CoreError::WorkingDirectory(format!("cannot create working directory: {e}")))?;

        debug!("Created working directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory reserved for the file at `index` in the batch.
    pub fn slot(&self, index: usize) -> PathBuf {
        self.dir.path().join(format!("{index:04}"))
    }

    /// Copies `source` into slot `index` under `name` and returns the copy's path.
    pub fn materialize(&self, index: usize, source: &Path, name: &str) -> CoreResult<PathBuf> {
        let slot = self.slot(index);
        fs::create_dir_all(&slot)?;
        let target = slot.join(name);
        fs::copy(source, &target)?;
        debug!("Materialized {} -> {}", source.display(), target.display());
        Ok(target)
    }

    /// Removes the directory now and reports failures instead of only logging them.
    pub fn close(self) -> CoreResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| {
            warn!("Failed to remove working directory {}: {}", path.display(), e);
            CoreError::WorkingDirectory(format!("cannot remove {}: {}", path.display(), e))
        })?;
        debug!("Removed working directory {}", path.display());
        Ok(())
    }
}
