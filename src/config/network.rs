//! Network location detection for chunk-size selection

use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem types mounted over a network
const NETWORK_FS_TYPES: &[&str] = &[
    "nfs", "nfs4", "cifs", "smb", "smb3", "smbfs", "ncpfs", "afs", "9p", "ceph", "glusterfs",
    "davfs", "fuse.sshfs", "sshfs", "fuse.rclone", "ftp", "sftp",
];

/// Whether `path` appears to live on a network share
///
/// * Windows: UNC paths (`\\server\share`)
/// * Linux: the covering mount in `/proc/mounts` has a network fs type
/// * Elsewhere: never
pub fn is_network_path(path: &Path) -> bool {
    if is_unc_path(path) {
        return true;
    }
    platform_is_network(path)
}

#[cfg(target_os = "linux")]
fn platform_is_network(path: &Path) -> bool {
    let mounts = match std::fs::read_to_string("/proc/mounts") {
        Ok(m) => m,
        Err(e) => {
            debug!(error = %e, "cannot read /proc/mounts, assuming local");
            return false;
        }
    };
    let resolved = nearest_existing(path);
    match mount_fs_type(&mounts, &resolved) {
        Some(fs_type) => {
            debug!(path = %resolved.display(), fs_type, "resolved mount");
            is_network_fs(fs_type)
        }
        None => false,
    }
}

#[cfg(not(target_os = "linux"))]
fn platform_is_network(path: &Path) -> bool {
    debug!(path = %path.display(), "no mount lookup on this platform");
    false
}

/// `\\server\share` style path
pub fn is_unc_path(path: &Path) -> bool {
    path.to_string_lossy().starts_with(r"\\")
}

pub fn is_network_fs(fs_type: &str) -> bool {
    NETWORK_FS_TYPES.contains(&fs_type)
}

/// Filesystem type of the longest mount point containing `path`.
///
/// `mounts` is in `/proc/mounts` format.
pub fn mount_fs_type<'a>(mounts: &'a str, path: &Path) -> Option<&'a str> {
    let mut best: Option<(usize, &'a str)> = None;

    for line in mounts.lines() {
        let mut fields = line.split_whitespace();
        let (Some(_device), Some(mount_point), Some(fs_type)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        let mount_point = unescape_mount_field(mount_point);
        if !path.starts_with(&mount_point) {
            continue;
        }
        let depth = Path::new(&mount_point).components().count();
        // later entries shadow earlier ones on the same mount point
        if best.map_or(true, |(best_depth, _)| depth >= best_depth) {
            best = Some((depth, fs_type));
        }
    }

    best.map(|(_, fs_type)| fs_type)
}

/// Decode the octal escapes (`\040` for space) used in `/proc/mounts`
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(digits) = bytes.get(i + 1..i + 4) {
                if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                    let value = digits
                        .iter()
                        .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                    if let Ok(byte) = u8::try_from(value) {
                        out.push(byte);
                        i += 4;
                        continue;
                    }
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Absolute form of the closest ancestor of `path` that exists, so a
/// destination that is about to be created still maps to its mount.
fn nearest_existing(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute
        .ancestors()
        .find_map(|p| std::fs::canonicalize(p).ok())
        .unwrap_or(absolute)
}
