//! Scoped temporary working directories for pipeline runs.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::Result;

/// A uniquely named temporary directory owned by exactly one pipeline run.
///
/// The directory is removed when the value is dropped, so every exit path of
/// a run (success, validation failure, tool failure) cleans up after itself.
/// Call [`Workdir::keep`] to retain it for debugging instead.
pub struct Workdir {
    dir: TempDir,
}

impl Workdir {
    pub fn create() -> Result<Workdir> {
        let dir = tempfile::Builder::new().prefix("gitstatic-").tempdir()?;
        Ok(Workdir { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Disarm cleanup and hand back the retained path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}
