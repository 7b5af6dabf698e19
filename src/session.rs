//! Browser session precondition.
//!
//! Ingest requests are only accepted once the login helper has captured an
//! authenticated browser session to disk.

use std::path::{Path, PathBuf};

/// Reports whether a captured browser session is available.
pub trait SessionProvider: Send + Sync {
    fn is_available(&self) -> bool;
}

/// Session backed by the storage-state file written by the login helper.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionProvider for FileSession {
    fn is_available(&self) -> bool {
        self.path.is_file()
    }
}
