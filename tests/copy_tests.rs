//! Tests for file and directory copy operations

use cprog::commands::copy::run_with;
use cprog::executor::StreamCopier;
use cprog::ui::{BarGeometry, DisplayColors, Palette, ProgressRenderer, Theme};
use cprog::{Config, CopyError, CopyStats};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_test_file(path: &PathBuf, content: &[u8]) {
    let mut file = fs::File::create(path).expect("Failed to create test file");
    file.write_all(content)
        .expect("Failed to write test content");
    file.flush().expect("Failed to flush");
}

fn plain_renderer() -> ProgressRenderer {
    ProgressRenderer::new(Theme::new(
        BarGeometry::new(20, Palette::Legacy),
        DisplayColors::off(),
    ))
}

fn config_for(source: &Path, destination: &Path) -> Config {
    Config {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        chunk_size: 4096,
        ..Config::default()
    }
}

/// Run a copy and return its result together with everything it printed
fn run_capture(config: &Config) -> (Result<CopyStats, CopyError>, String) {
    let renderer = plain_renderer();
    let mut copier = StreamCopier::new(&renderer, Vec::new(), config.chunk_size);
    let result = run_with(config, &mut copier);
    let out = String::from_utf8(copier.into_output()).expect("utf8 output");
    (result, out)
}

#[test]
fn test_copy_basic_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.txt");
    let content = b"Hello, cprog! This is a test file.";
    create_test_file(&src_path, content);

    let dest_path = root.join("dest.txt");
    let (result, out) = run_capture(&config_for(&src_path, &dest_path));
    let stats = result.expect("copy should succeed");

    assert_eq!(stats.files_copied, 1);
    assert_eq!(stats.bytes_copied, content.len() as u64);
    assert_eq!(fs::read(&dest_path).expect("read dest"), content);
    assert!(out.contains("Copying "));
    assert!(out.contains("MB copied in "));
    assert!(!out.contains('\x1b'));
}

#[test]
fn test_copy_overwrites_existing_file_destination() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("new.txt");
    let dest_path = root.join("old.txt");
    create_test_file(&src_path, b"new");
    create_test_file(&dest_path, b"old and longer");

    let (result, _) = run_capture(&config_for(&src_path, &dest_path));
    result.expect("copy should succeed");

    assert_eq!(fs::read(&dest_path).expect("read dest"), b"new");
}

#[test]
fn test_copy_into_directory_appends_file_name() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("a.txt");
    create_test_file(&src_path, b"payload");
    let dest_dir = root.join("out");
    fs::create_dir(&dest_dir).expect("create dest dir");

    let (result, out) = run_capture(&config_for(&src_path, &dest_dir));
    result.expect("copy should succeed");

    let effective = dest_dir.join("a.txt");
    assert_eq!(fs::read(&effective).expect("read dest"), b"payload");
    assert!(out.starts_with(&format!("{}\n", effective.display())));
}

#[test]
fn test_copy_into_directory_skips_existing_target() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("a.txt");
    create_test_file(&src_path, b"new content");
    let dest_dir = root.join("out");
    fs::create_dir(&dest_dir).expect("create dest dir");
    let existing = dest_dir.join("a.txt");
    create_test_file(&existing, b"keep");

    let (result, out) = run_capture(&config_for(&src_path, &dest_dir));
    let stats = result.expect("skip is not an error");

    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.files_copied, 0);
    assert_eq!(fs::read(&existing).expect("read existing"), b"keep");
    assert!(out.contains(&format!("File {} already exists", existing.display())));
    assert!(!out.contains("Copying"));
}

#[test]
fn test_copy_large_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("large.bin");
    let size = 1024 * 1024 + 17;
    let content: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    create_test_file(&src_path, &content);

    let dest_path = root.join("large_copy.bin");
    let (result, _) = run_capture(&config_for(&src_path, &dest_path));
    let stats = result.expect("copy should handle large files");

    assert_eq!(stats.bytes_copied, size as u64);
    assert_eq!(fs::read(&dest_path).expect("read dest"), content);
}

#[test]
fn test_copy_empty_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("empty");
    create_test_file(&src_path, b"");
    let dest_path = root.join("empty_copy");

    let (result, out) = run_capture(&config_for(&src_path, &dest_path));
    result.expect("empty copy should succeed");

    assert!(dest_path.exists());
    assert_eq!(fs::metadata(&dest_path).expect("dest metadata").len(), 0);
    assert!(out.contains("100.00%"));
    assert!(out.contains("0.0MB copied in "));
}

#[test]
fn test_copy_preserves_permissions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("source.sh");
    create_test_file(&src_path, b"#!/bin/sh\n");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&src_path)
            .expect("Failed to get metadata")
            .permissions();
        perms.set_mode(0o751);
        fs::set_permissions(&src_path, perms).expect("Failed to set permissions");
    }

    let dest_path = root.join("dest.sh");
    let (result, _) = run_capture(&config_for(&src_path, &dest_path));
    result.expect("copy should succeed");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let dest_perms = fs::metadata(&dest_path)
            .expect("Failed to get dest metadata")
            .permissions();
        assert_eq!(dest_perms.mode() & 0o777, 0o751, "Permissions should be preserved");
    }
}

#[test]
fn test_same_file_is_refused() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("same.txt");
    create_test_file(&src_path, b"untouched");

    let (result, _) = run_capture(&config_for(&src_path, &src_path));
    assert!(matches!(result, Err(CopyError::SameFile { .. })));
    assert_eq!(fs::read(&src_path).expect("read source"), b"untouched");
}

#[cfg(unix)]
#[test]
fn test_hard_link_counts_as_same_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let src_path = root.join("orig.txt");
    create_test_file(&src_path, b"linked");
    let link_path = root.join("link.txt");
    fs::hard_link(&src_path, &link_path).expect("create hard link");

    let (result, _) = run_capture(&config_for(&src_path, &link_path));
    assert!(matches!(result, Err(CopyError::SameFile { .. })));
    assert_eq!(fs::read(&src_path).expect("read source"), b"linked");
}

#[cfg(unix)]
#[test]
fn test_named_pipe_source_is_refused() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let fifo = root.join("pipe");
    let made = std::process::Command::new("mkfifo")
        .arg(&fifo)
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    if !made {
        eprintln!("mkfifo unavailable, skipping");
        return;
    }

    let dest_path = root.join("out");
    let (result, _) = run_capture(&config_for(&fifo, &dest_path));
    assert!(matches!(result, Err(CopyError::SpecialFile { .. })));
    assert!(!dest_path.exists());
}

#[test]
fn test_missing_source() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    let (result, _) = run_capture(&config_for(&root.join("missing"), &root.join("out")));
    assert!(matches!(result, Err(CopyError::SourceNotFound { .. })));
}

#[test]
fn test_directory_tree_copy() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    let dest_root = dst.path().join("copy");

    fs::create_dir_all(src.path().join("nested/deeper")).expect("create nested dirs");
    fs::create_dir_all(src.path().join("empty")).expect("create empty dir");
    fs::write(src.path().join("root.txt"), b"root-content").expect("write root file");
    fs::write(src.path().join("nested/inner.txt"), b"inner-content").expect("write inner");
    fs::write(src.path().join("nested/deeper/big.bin"), vec![9u8; 10_000])
        .expect("write big file");

    let (result, out) = run_capture(&config_for(src.path(), &dest_root));
    let stats = result.expect("tree copy should succeed");

    assert_eq!(stats.files_copied, 3);
    assert_eq!(stats.dirs_created, 3);
    assert_eq!(stats.bytes_copied, 12 + 13 + 10_000);
    assert_eq!(
        fs::read(dest_root.join("root.txt")).expect("read root"),
        b"root-content"
    );
    assert_eq!(
        fs::read(dest_root.join("nested/inner.txt")).expect("read inner"),
        b"inner-content"
    );
    assert_eq!(
        fs::read(dest_root.join("nested/deeper/big.bin")).expect("read big"),
        vec![9u8; 10_000]
    );
    assert!(dest_root.join("empty").is_dir());
    assert_eq!(out.matches("Copying ").count(), 3);
    assert!(out.contains("3 files, 3 directories"));
}

#[test]
fn test_directory_copy_overwrites_existing_files() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("same.txt"), b"new-data").expect("write source version");
    fs::write(dst.path().join("same.txt"), b"old").expect("write destination version");

    let (result, _) = run_capture(&config_for(src.path(), dst.path()));
    result.expect("tree copy should succeed");

    assert_eq!(
        fs::read(dst.path().join("same.txt")).expect("read updated file"),
        b"new-data"
    );
}

#[test]
fn test_directory_copy_continues_after_failure() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("a.txt"), b"a").expect("write a");
    fs::write(src.path().join("b.txt"), b"b").expect("write b");
    fs::write(src.path().join("c.txt"), b"c").expect("write c");
    // a directory squatting on a file's target makes that one copy fail
    fs::create_dir(dst.path().join("b.txt")).expect("create blocking dir");

    let (result, out) = run_capture(&config_for(src.path(), dst.path()));

    match result {
        Err(CopyError::Incomplete { failed, total }) => {
            assert_eq!(failed, 1);
            assert_eq!(total, 3);
        }
        other => panic!("expected incomplete copy, got {other:?}"),
    }
    assert_eq!(fs::read(dst.path().join("a.txt")).expect("read a"), b"a");
    assert_eq!(fs::read(dst.path().join("c.txt")).expect("read c"), b"c");
    assert!(out.contains("Error summary:"));
    assert!(out.contains("b.txt"));
}
