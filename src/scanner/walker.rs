//! Sequential source tree walker

use crate::types::CopyError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One item of a source tree, relative to the walked root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// Directory to recreate (symlinked directories are not descended)
    Dir(PathBuf),

    /// File whose contents are copied
    File { path: PathBuf, size: u64 },
}

impl TreeEntry {
    pub fn path(&self) -> &Path {
        match self {
            TreeEntry::Dir(path) => path,
            TreeEntry::File { path, .. } => path,
        }
    }
}

/// Everything below a root, parents always listed before their children
#[derive(Debug, Clone, Default)]
pub struct TreeListing {
    pub entries: Vec<TreeEntry>,
    pub total_files: usize,
    pub total_dirs: usize,
    pub total_bytes: u64,
}

impl TreeListing {
    fn push(&mut self, entry: TreeEntry) {
        match &entry {
            TreeEntry::Dir(_) => self.total_dirs += 1,
            TreeEntry::File { size, .. } => {
                self.total_files += 1;
                self.total_bytes += size;
            }
        }
        self.entries.push(entry);
    }
}

/// List a directory tree for copying
///
/// Walks `root` depth-first in file-name order using the `ignore` crate
/// with every filter disabled, so hidden and git-ignored files are kept.
///
/// # Errors
/// * `SourceNotFound` if `root` does not exist
/// * `Io` if `root` is not a directory
/// * Unreadable entries and broken symlinks are logged and skipped
pub fn scan_tree(root: &Path) -> Result<TreeListing, CopyError> {
    let root_metadata = fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CopyError::SourceNotFound {
            path: root.to_path_buf(),
        },
        _ => CopyError::Io(e),
    })?;
    if !root_metadata.is_dir() {
        return Err(CopyError::Io(std::io::Error::other(format!(
            "{} is not a directory",
            root.display()
        ))));
    }

    let mut listing = TreeListing::default();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry during tree walk");
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(p) => p.to_path_buf(),
            Err(_) => {
                warn!(path = %entry.path().display(), "entry outside walk root, skipped");
                continue;
            }
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            listing.push(TreeEntry::Dir(relative));
            continue;
        }

        // Symlinks are resolved: file targets are copied by content,
        // directory targets become empty directories.
        let metadata = if file_type.is_symlink() {
            fs::metadata(entry.path())
        } else {
            entry.metadata().map_err(std::io::Error::other)
        };
        let metadata = match metadata {
            Ok(m) => m,
            Err(e) => {
                warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "cannot read metadata, skipped"
                );
                continue;
            }
        };

        if metadata.is_dir() {
            listing.push(TreeEntry::Dir(relative));
        } else {
            listing.push(TreeEntry::File {
                path: relative,
                size: metadata.len(),
            });
        }
    }

    debug!(
        root = %root.display(),
        files = listing.total_files,
        dirs = listing.total_dirs,
        bytes = listing.total_bytes,
        "scanned source tree"
    );
    Ok(listing)
}
