//! Single file copy with progress

use super::stream::{Clock, StreamCopier, TransferReport};
use crate::types::CopyError;
use std::fs::{self, File, Metadata};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Copy one file, drawing progress through `copier`
///
/// 1. Refuse identical source/destination and special files
/// 2. Stream the contents chunk by chunk
/// 3. Copy permission bits
///
/// # Arguments
/// * `src` - Source file path (symlinks are followed)
/// * `dest` - Destination file path, created or truncated
/// * `copier` - Engine holding the renderer, chunk size and output
///
/// # Returns
/// * `Ok(TransferReport)` - Bytes and chunks moved
/// * `Err(CopyError)` - Pre-flight refusal or IO failure
///
/// # Example
/// ```no_run
/// use cprog::executor::{copy_file_with_progress, StreamCopier, LOCAL_CHUNK_SIZE};
/// use cprog::ui::{ProgressRenderer, Theme};
/// use std::path::Path;
///
/// let renderer = ProgressRenderer::new(Theme::detect(false));
/// let mut copier = StreamCopier::new(&renderer, std::io::stdout(), LOCAL_CHUNK_SIZE);
/// let report = copy_file_with_progress(
///     Path::new("source.bin"),
///     Path::new("dest.bin"),
///     &mut copier,
/// )?;
/// println!("{} bytes", report.bytes_copied);
/// # Ok::<(), cprog::types::CopyError>(())
/// ```
pub fn copy_file_with_progress<O: Write, C: Clock>(
    src: &Path,
    dest: &Path,
    copier: &mut StreamCopier<'_, O, C>,
) -> Result<TransferReport, CopyError> {
    // ═══════════════════════════════════════════════════════════
    // STEP 1: Pre-flight - nothing is touched if these fail
    // ═══════════════════════════════════════════════════════════
    let src_metadata = fs::metadata(src).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CopyError::SourceNotFound {
            path: src.to_path_buf(),
        },
        _ => CopyError::Io(e),
    })?;

    let dest_metadata = match fs::metadata(dest) {
        Ok(m) => Some(m),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(CopyError::Io(e)),
    };

    if let Some(dest_metadata) = &dest_metadata {
        if is_same_file(src, &src_metadata, dest, dest_metadata) {
            return Err(CopyError::SameFile {
                src: src.to_path_buf(),
                dst: dest.to_path_buf(),
            });
        }
    }

    for (path, metadata) in [(src, Some(&src_metadata)), (dest, dest_metadata.as_ref())] {
        if metadata.is_some_and(is_special_file) {
            return Err(CopyError::SpecialFile {
                path: path.to_path_buf(),
            });
        }
    }

    debug!(
        src = %src.display(),
        size = src_metadata.len(),
        overwrite = dest_metadata.is_some(),
        "pre-flight checks passed"
    );

    // ═══════════════════════════════════════════════════════════
    // STEP 2: Copy - both handles close on every exit path
    // ═══════════════════════════════════════════════════════════
    copier.println(format_args!("Copying {} -> {}", src.display(), dest.display()));

    let report = {
        let src_file = File::open(src)?;
        let dest_file = File::create(dest)?;
        copier.copy(src_file, dest_file, src_metadata.len())?
    };

    // ═══════════════════════════════════════════════════════════
    // STEP 3: Metadata - permission bits only
    // ═══════════════════════════════════════════════════════════
    fs::set_permissions(dest, src_metadata.permissions())?;

    info!(
        src = %src.display(),
        dest = %dest.display(),
        bytes = report.bytes_copied,
        "copied file"
    );
    Ok(report)
}

#[cfg(unix)]
fn is_same_file(_src: &Path, a: &Metadata, _dest: &Path, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn is_same_file(src: &Path, _a: &Metadata, dest: &Path, _b: &Metadata) -> bool {
    match (fs::canonicalize(src), fs::canonicalize(dest)) {
        (Ok(a), Ok(b)) => a == b,
        (a, b) => {
            debug!(?a, ?b, "could not canonicalize for same-file check");
            false
        }
    }
}

/// Named pipes and sockets would block or fail mid-stream
#[cfg(unix)]
fn is_special_file(metadata: &Metadata) -> bool {
    use std::os::unix::fs::FileTypeExt;
    let file_type = metadata.file_type();
    file_type.is_fifo() || file_type.is_socket()
}

#[cfg(not(unix))]
fn is_special_file(_metadata: &Metadata) -> bool {
    false
}
