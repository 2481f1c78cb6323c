//! Error types for cprog

use std::path::PathBuf;
use thiserror::Error;

/// Error types for copy operations
#[derive(Debug, Error)]
pub enum CopyError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid command-line configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source path is missing
    #[error("Source '{}' does not exist", path.display())]
    SourceNotFound { path: PathBuf },

    /// Source and destination resolve to the same file
    #[error("{} and {} are the same file", src.display(), dst.display())]
    SameFile { src: PathBuf, dst: PathBuf },

    /// Named pipe or socket where a regular file was expected
    #[error("`{}` is a special file (named pipe or socket)", path.display())]
    SpecialFile { path: PathBuf },

    /// Target of a file-into-directory copy already exists
    #[error("File {} already exists", path.display())]
    DestinationExists { path: PathBuf },

    /// Directory copy finished but some entries failed
    #[error("Directory copy incomplete: {failed} of {total} entries failed")]
    Incomplete { failed: usize, total: usize },
}

impl CopyError {
    /// Errors that are reported and skipped instead of failing the run
    pub fn is_skippable(&self) -> bool {
        matches!(self, CopyError::DestinationExists { .. })
    }

    /// Check if this error was raised before any data was touched
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            CopyError::SourceNotFound { .. }
                | CopyError::SameFile { .. }
                | CopyError::SpecialFile { .. }
                | CopyError::DestinationExists { .. }
                | CopyError::Config(_)
        )
    }
}
