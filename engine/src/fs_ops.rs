//! Filesystem operations module.
//!
//! This module provides the low-level operations the pipeline is built on:
//! - Listing the direct children of a directory
//! - Querying file sizes
//! - Moving files (rename, or copy with metadata preservation + delete)
//! - Deleting files

use std::fs;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use crate::error::EngineError;
use crate::model::{FileEntry, FileListing};
use crate::report::Reporter;

const COMPONENT: &str = "lister";

/// List the direct children of `dir`, in the order the OS returns them.
///
/// Subdirectories appear as single entries and are not descended into.
/// Dot-prefixed entries are skipped unless `include_hidden` is set.
///
/// # Arguments
/// * `dir` - Directory to list
/// * `with_root` - If true, entries carry the full path; otherwise only the file name
/// * `include_hidden` - Whether to keep entries whose name starts with `.`
/// * `reporter` - Receives the raw listing at debug level
///
/// # Errors
/// Returns `DirectoryAccess` if `dir` is missing or unreadable, and
/// `NotADirectory` if it is something other than a directory.
pub fn list_dir(
    dir: &Path,
    with_root: bool,
    include_hidden: bool,
    reporter: &dyn Reporter,
) -> Result<FileListing, EngineError> {
    ensure_directory(dir)?;

    let entries = fs::read_dir(dir).map_err(|e| EngineError::DirectoryAccess {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut listing = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::DirectoryAccess {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let name = entry.file_name();
        if !include_hidden && name.to_string_lossy().starts_with('.') {
            continue;
        }

        if with_root {
            listing.push(FileEntry::new(entry.path()));
        } else {
            listing.push(FileEntry::new(name));
        }
    }

    reporter.debug(
        COMPONENT,
        "list_dir",
        format!("listing of {}: {:?}", dir.display(), paths(&listing)),
    );

    Ok(listing)
}

/// Keep only entries whose extension equals `extension`.
///
/// A leading dot in `extension` is ignored. Matching is case-sensitive.
pub fn filter_by_extension(listing: FileListing, extension: &str) -> FileListing {
    let wanted = extension.trim_start_matches('.');
    listing
        .into_iter()
        .filter(|entry| {
            entry
                .path
                .extension()
                .map(|ext| ext == wanted)
                .unwrap_or(false)
        })
        .collect()
}

/// Verify that `path` exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<(), EngineError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(EngineError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(EngineError::DirectoryAccess {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Byte size of the file at `path`.
pub fn file_size(path: &Path) -> Result<u64, EngineError> {
    fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|e| EngineError::FileAccess {
            path: path.to_path_buf(),
            operation: "query size of",
            source: e,
        })
}

/// Delete every file in `listing`, stopping at the first failure.
pub fn delete_files(listing: &[FileEntry], reporter: &dyn Reporter) -> Result<(), EngineError> {
    for entry in listing {
        fs::remove_file(&entry.path).map_err(|e| EngineError::FileAccess {
            path: entry.path.clone(),
            operation: "delete",
            source: e,
        })?;
        reporter.info(
            "fs_ops",
            "delete_files",
            format!("Deleted file {}", entry.path.display()),
        );
    }
    Ok(())
}

/// Move `src` to `dst`, replacing a regular file already at `dst`.
///
/// Tries a rename first. Only when the rename fails because `src` and `dst`
/// are on different filesystems is a regular file copied across instead
/// (see `copy_then_replace`). Any other rename failure leaves both paths
/// untouched.
///
/// # Errors
/// Returns `FileAccess` describing the step that failed.
pub fn move_file(src: &Path, dst: &Path) -> Result<(), EngineError> {
    let rename_err = match fs::rename(src, dst) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    let is_file = fs::metadata(src).map(|m| m.is_file()).unwrap_or(false);
    if !is_cross_device(&rename_err) || !is_file {
        return Err(EngineError::FileAccess {
            path: src.to_path_buf(),
            operation: "move",
            source: rename_err,
        });
    }

    copy_then_replace(src, dst)
}

#[cfg(windows)]
const CROSS_DEVICE: i32 = 17; // ERROR_NOT_SAME_DEVICE
#[cfg(not(windows))]
const CROSS_DEVICE: i32 = 18; // EXDEV

fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(CROSS_DEVICE)
}

/// Move a regular file by copying it next to `dst` and renaming it into place.
///
/// Steps, in order:
/// 1. copy `src` into a temp file in `dst`'s directory, keeping its mtime
/// 2. remove `src`
/// 3. rename the temp file over `dst`
///
/// A failure in step 1 or 2 drops the temp file, so `src` and `dst` are
/// exactly as before. If step 3 fails the content is kept at the temp path,
/// which the error names.
pub(crate) fn copy_then_replace(src: &Path, dst: &Path) -> Result<(), EngineError> {
    let dst_dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut src_file = fs::File::open(src).map_err(|e| EngineError::FileAccess {
        path: src.to_path_buf(),
        operation: "open",
        source: e,
    })?;
    let src_mtime = src_file.metadata().and_then(|m| m.modified()).ok();

    let mut staged = NamedTempFile::new_in(dst_dir).map_err(|e| EngineError::FileAccess {
        path: dst_dir.to_path_buf(),
        operation: "create temp file in",
        source: e,
    })?;

    io::copy(&mut src_file, staged.as_file_mut()).map_err(|e| EngineError::FileAccess {
        path: src.to_path_buf(),
        operation: "copy",
        source: e,
    })?;
    drop(src_file);

    if let Some(mtime) = src_mtime {
        let _ = filetime::set_file_mtime(staged.path(), filetime::FileTime::from_system_time(mtime));
    }

    fs::remove_file(src).map_err(|e| EngineError::FileAccess {
        path: src.to_path_buf(),
        operation: "remove copied file",
        source: e,
    })?;

    staged.persist(dst).map(|_| ()).map_err(|e| {
        let kept = e.file.into_temp_path().keep().ok();
        EngineError::FileAccess {
            path: kept.unwrap_or_else(|| dst.to_path_buf()),
            operation: "rename copied content into place from",
            source: e.error,
        }
    })
}

fn paths(listing: &[FileEntry]) -> Vec<&Path> {
    listing.iter().map(|e| e.path.as_path()).collect()
}
