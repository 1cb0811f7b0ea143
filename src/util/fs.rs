//! Filesystem utilities.
//!
//! Errors carry the path and the operation that failed so callers can turn
//! them into pipeline errors without re-deriving context.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// A failed filesystem operation.
#[derive(Debug, Error)]
#[error("failed to {op} {}", path.display())]
pub struct FsError {
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FsError {
    fn new(op: &'static str, path: &Path, source: io::Error) -> Self {
        FsError {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;

/// Ensure a directory exists, creating it and its parents if necessary.
pub fn ensure_dir(path: &Path) -> FsResult<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| FsError::new("create directory", path, e))?;
    }
    Ok(())
}

/// Copy a single file, creating the destination's parent directories.
///
/// An existing destination is overwritten.
pub fn copy_file(src: &Path, dst: &Path) -> FsResult<()> {
    if !src.is_file() {
        return Err(FsError::new(
            "copy missing file",
            src,
            io::Error::new(io::ErrorKind::NotFound, "source file does not exist"),
        ));
    }
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dst).map_err(|e| FsError::new("copy to", dst, e))?;
    Ok(())
}

/// Recursively copy a directory tree into `dst`.
///
/// Merges into an existing destination: files present in `src` overwrite
/// their counterparts, anything else already under `dst` is left alone.
/// Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> FsResult<usize> {
    if !src.is_dir() {
        return Err(FsError::new(
            "copy missing directory",
            src,
            io::Error::new(io::ErrorKind::NotFound, "source directory does not exist"),
        ));
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
            FsError::new("read", &path, source)
        })?;

        let rel = entry
            .path()
            .strip_prefix(src)
            .unwrap_or_else(|_| unreachable!("walkdir yields paths under its root"));
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| FsError::new("copy to", &target, e))?;
            tracing::trace!("copied {} -> {}", entry.path().display(), target.display());
            copied += 1;
        }
    }
    Ok(copied)
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> FsResult<bool> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| FsError::new("remove directory", path, e))?;
        return Ok(true);
    }
    Ok(false)
}

/// Make `path` absolute against the current directory.
///
/// Symlinks are not resolved and no verbatim (`\\?\`) prefix is added on
/// Windows, so the result can be handed to CMake and MSBuild unchanged.
pub fn absolute_path(path: &Path) -> FsResult<PathBuf> {
    std::path::absolute(path).map_err(|e| FsError::new("resolve", path, e))
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}
