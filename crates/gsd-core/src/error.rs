use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Raised only for documents that exist but cannot be read. A missing file or
/// directory is never an error; callers see `Ok(None)` or an empty list.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PlanningError {
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn list_dir(path: &Path, source: io::Error) -> Self {
        Self::ListDir {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            PlanningError::Read { path, .. } | PlanningError::ListDir { path, .. } => path,
        }
    }
}
