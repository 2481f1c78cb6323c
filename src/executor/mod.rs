//! Executor module for file operations

pub mod copy;
pub mod stream;

pub use copy::copy_file_with_progress;
pub use stream::{
    Clock, MonotonicClock, StreamCopier, TransferReport, DISPLAY_INTERVAL, ETA_INTERVAL,
    LOCAL_CHUNK_SIZE, MAX_CHUNK_SIZE, NETWORK_CHUNK_SIZE,
};

/// Totals for one copy run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Files whose contents were fully copied
    pub files_copied: usize,
    /// Files left alone because the target already existed
    pub files_skipped: usize,
    /// Files that failed; the run continued past them
    pub files_failed: usize,
    /// Directories created (or already present) in the destination
    pub dirs_created: usize,
    /// Directories that could not be created
    pub dirs_failed: usize,
    /// Aggregate copied bytes
    pub bytes_copied: u64,
}

impl CopyStats {
    pub fn record_copy(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied += bytes;
    }

    pub fn failures(&self) -> usize {
        self.files_failed + self.dirs_failed
    }
}
