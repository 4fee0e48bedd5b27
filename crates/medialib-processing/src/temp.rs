//! Scratch file management
//!
//! Pipelines stage converted bytes in scratch files before uploading them
//! to a blob store. A `ScratchFile` is exclusive to its invocation and is
//! removed on release or on drop, whichever comes first, so every exit
//! path of a pipeline cleans up after itself.

use std::io;
use std::path::{Path, PathBuf};

/// A uniquely named, initially empty scratch file.
pub struct ScratchFile {
    path: PathBuf,
    released: bool,
}

impl ScratchFile {
    /// Allocate a fresh scratch file in the system temp directory.
    ///
    /// The file is created exclusively, so the path cannot collide with a
    /// concurrent invocation.
    pub fn acquire() -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("medialib-")
            .suffix(".tmp")
            .tempfile()?;

        // Keep the path alive past the handle; pipeline steps reopen by path.
        let (_, path) = file.keep().map_err(|e| e.error)?;

        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the scratch file.
    ///
    /// Idempotent and safe on a partially written or already missing file.
    /// Removal failure is a degraded state, never an error.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove scratch file"
                );
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.release();
    }
}
