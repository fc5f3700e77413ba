//! Filesystem helpers shared by the extractor and the ingestor.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use walkdir::WalkDir;

use crate::constants::ILLEGAL_PATH_CHARS;
use crate::error::{FileMoverError, FileMoverResult};

/// First free path for `file_name` inside `dir`.
///
/// `photo.jpg` becomes `photo_1.jpg`, then `photo_2.jpg`, and so on. The
/// suffix goes before the last extension. Names need not be UTF-8.
pub fn unique_destination(dir: &Path, file_name: impl AsRef<OsStr>) -> PathBuf {
    let file_name = Path::new(file_name.as_ref());
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = file_name.file_stem().unwrap_or(file_name.as_os_str());
    let ext = file_name.extension();
    (1..)
        .map(|n| {
            let mut name = OsString::from(stem);
            name.push(format!("_{n}"));
            if let Some(ext) = ext {
                name.push(".");
                name.push(ext);
            }
            dir.join(name)
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Make a user-supplied name usable as a single folder name.
///
/// Illegal path characters and control characters become `_`. Trailing dots
/// and spaces are dropped because some filesystems refuse them.
pub fn sanitize_folder_name(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| {
            if ILLEGAL_PATH_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    replaced.trim_end_matches(['.', ' ']).to_string()
}

/// Lowercased extension of `path`, without the dot.
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Create `dir` and its parents; succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> FileMoverResult<()> {
    fs::create_dir_all(dir).map_err(|e| FileMoverError::from_io(e, dir))
}

/// Copy a file's contents and permissions, then carry over its timestamps.
pub fn copy_preserving(src: &Path, dest: &Path) -> FileMoverResult<()> {
    fs::copy(src, dest).map_err(|e| classify_copy_error(e, src, dest))?;

    let metadata = fs::metadata(src).map_err(|e| FileMoverError::from_io(e, src))?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    if let Err(e) = filetime::set_file_times(dest, atime, mtime) {
        tracing::debug!(path = %dest.display(), error = %e, "could not preserve timestamps");
    }
    Ok(())
}

/// Attribute a failed copy to whichever side is actually at fault.
fn classify_copy_error(err: std::io::Error, src: &Path, dest: &Path) -> FileMoverError {
    if !src.exists() {
        FileMoverError::NotFound {
            path: src.to_path_buf(),
        }
    } else if err.kind() == std::io::ErrorKind::PermissionDenied && dest.exists() {
        FileMoverError::PermissionDenied {
            path: dest.to_path_buf(),
        }
    } else {
        FileMoverError::from_io(err, src)
    }
}

/// Move a file or directory, copying then deleting if a rename is not possible.
pub fn move_entry(src: &Path, dest: &Path) -> FileMoverResult<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }

    if src.is_dir() {
        copy_tree(src, dest)?;
        fs::remove_dir_all(src).map_err(|e| FileMoverError::from_io(e, src))
    } else {
        copy_preserving(src, dest)?;
        fs::remove_file(src).map_err(|e| FileMoverError::from_io(e, src))
    }
}

fn copy_tree(src: &Path, dest: &Path) -> FileMoverResult<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| walk_error(e, src))?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            copy_preserving(entry.path(), &target)?;
        }
    }
    Ok(())
}

pub(crate) fn walk_error(err: walkdir::Error, root: &Path) -> FileMoverError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(io) => FileMoverError::from_io(io, path),
        None => FileMoverError::Io {
            path,
            source: std::io::Error::other("filesystem loop detected"),
        },
    }
}
