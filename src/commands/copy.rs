//! Main copy command

use crate::executor::{copy_file_with_progress, Clock, CopyStats, StreamCopier};
use crate::scanner::{scan_tree, TreeEntry};
use crate::types::CopyError;
use crate::ui::{ProgressRenderer, Theme};
use crate::Config;
use indicatif::{HumanBytes, HumanDuration};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Run the copy operation, drawing progress on stdout
pub fn run(config: &Config) -> Result<CopyStats, CopyError> {
    let renderer = ProgressRenderer::new(Theme::detect(config.legacy_display));
    let mut copier = StreamCopier::new(&renderer, io::stdout(), config.chunk_size);
    run_with(config, &mut copier)
}

/// Run the copy operation through an existing engine
///
/// * file -> file: copy, overwriting the destination
/// * file -> directory: copy to `<dir>/<file name>`, skipped if it exists
/// * directory -> directory: recreate the tree; failed files are reported
///   and the walk continues
pub fn run_with<O: Write, C: Clock>(
    config: &Config,
    copier: &mut StreamCopier<'_, O, C>,
) -> Result<CopyStats, CopyError> {
    config.validate()?;
    debug!(chunk_size = copier.chunk_size(), "chunk size selected");

    let source_metadata = fs::metadata(&config.source).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CopyError::SourceNotFound {
            path: config.source.clone(),
        },
        _ => CopyError::Io(e),
    })?;

    if source_metadata.is_dir() {
        return copy_tree(&config.source, &config.destination, copier);
    }

    let mut stats = CopyStats::default();
    let target = if config.destination.is_dir() {
        let target = target_in_directory(&config.source, &config.destination)?;
        copier.println(target.display());
        if target.exists() {
            let skipped = CopyError::DestinationExists { path: target };
            copier.println(&skipped);
            info!(reason = %skipped, "skipped file");
            stats.files_skipped += 1;
            return Ok(stats);
        }
        target
    } else {
        config.destination.clone()
    };

    let report = copy_file_with_progress(&config.source, &target, copier)?;
    stats.record_copy(report.bytes_copied);
    Ok(stats)
}

/// `<dir>/<file name of source>`
fn target_in_directory(source: &Path, dir: &Path) -> Result<PathBuf, CopyError> {
    let name = source.file_name().ok_or_else(|| {
        CopyError::Config(format!("Cannot determine a file name for {}", source.display()))
    })?;
    Ok(dir.join(name))
}

fn copy_tree<O: Write, C: Clock>(
    source: &Path,
    destination: &Path,
    copier: &mut StreamCopier<'_, O, C>,
) -> Result<CopyStats, CopyError> {
    let started = Instant::now();
    let listing = scan_tree(source)?;
    fs::create_dir_all(destination)?;

    let mut stats = CopyStats::default();
    let mut records = Vec::new();

    for entry in &listing.entries {
        let target = destination.join(entry.path());
        let result = match entry {
            TreeEntry::Dir(_) => fs::create_dir_all(&target)
                .map(|()| stats.dirs_created += 1)
                .map_err(|e| {
                    stats.dirs_failed += 1;
                    CopyError::Io(e)
                }),
            TreeEntry::File { .. } => {
                copy_file_with_progress(&source.join(entry.path()), &target, copier)
                    .map(|report| stats.record_copy(report.bytes_copied))
                    .map_err(|e| {
                        stats.files_failed += 1;
                        e
                    })
            }
        };

        if let Err(err) = result {
            error!(path = %target.display(), error = %err, "copy failed, continuing");
            records.push(ErrorRecord::new(&target, &err));
        }
    }

    copier.println("");
    copier.println(format_tree_summary(&stats, started.elapsed()));

    if records.is_empty() {
        Ok(stats)
    } else {
        copier.println(format_error_summary(&records));
        Err(CopyError::Incomplete {
            failed: stats.failures(),
            total: listing.entries.len(),
        })
    }
}

fn format_tree_summary(stats: &CopyStats, elapsed: std::time::Duration) -> String {
    format!(
        "{} files, {} directories | {} copied in {}",
        stats.files_copied,
        stats.dirs_created,
        HumanBytes(stats.bytes_copied),
        HumanDuration(elapsed)
    )
}

#[derive(Debug)]
struct ErrorRecord {
    kind: &'static str,
    path: PathBuf,
    message: String,
}

impl ErrorRecord {
    fn new(path: &Path, error: &CopyError) -> Self {
        Self {
            kind: error_kind_label(error),
            path: path.to_path_buf(),
            message: error.to_string(),
        }
    }
}

fn error_kind_label(error: &CopyError) -> &'static str {
    match error {
        CopyError::Io(io) => match io.kind() {
            ErrorKind::NotFound => "Not found",
            ErrorKind::PermissionDenied => "Permission denied",
            _ => "I/O error",
        },
        CopyError::Config(_) => "Configuration error",
        CopyError::SourceNotFound { .. } => "Not found",
        CopyError::SameFile { .. } => "Same file",
        CopyError::SpecialFile { .. } => "Special file",
        CopyError::DestinationExists { .. } => "Already exists",
        CopyError::Incomplete { .. } => "Incomplete",
    }
}

fn format_error_summary(records: &[ErrorRecord]) -> String {
    let mut groups: BTreeMap<&'static str, Vec<&ErrorRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.kind).or_default().push(record);
    }

    let mut lines = Vec::new();
    lines.push("Error summary:".to_string());
    for (kind, items) in groups {
        lines.push(format!("  {} ({}):", kind, items.len()));
        for record in items.iter().take(3) {
            lines.push(format!("    - {}", record.message));
            lines.push(format!("      Path: {}", record.path.display()));
        }
        if items.len() > 3 {
            lines.push(format!("    - ... {} more", items.len() - 3));
        }
    }
    lines.join("\n")
}
