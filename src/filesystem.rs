//! On-disk tree helpers and the disposable staging copy of the working tree

use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Create a scratch directory that is deleted when the value is dropped.
///
/// `prefix` only affects the directory name, to make leftovers recognizable
/// if the process is killed.
pub fn scratch_dir(prefix: &str) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .map_err(|e| Error::fs(std::env::temp_dir(), e))
}

/// List every regular file under `root`, in a stable sorted order.
///
/// Directories are walked but not returned. Symlinks are not followed.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::fs(path, e)
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Copy every regular file under `src` into `dst`, keeping relative layout.
///
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(Error::fs(src, "source directory does not exist"));
    }

    let mut copied = 0;
    for file in list_files(src)? {
        let relative = file
            .strip_prefix(src)
            .map_err(|e| Error::fs(&file, e))?;
        let target = dst.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
        }
        fs::copy(&file, &target).map_err(|e| Error::fs(&file, e))?;
        copied += 1;
    }
    Ok(copied)
}

/// A staged, exclusively owned copy of the working source tree.
///
/// The copy is mutated in place by relocation reversal and removed when the
/// value is dropped, whether or not the run succeeded.
#[derive(Debug)]
pub struct SourceTree {
    dir: TempDir,
    files: usize,
}

impl SourceTree {
    /// Stage a fresh copy of `source` in a new scratch directory.
    pub fn stage(source: &Path) -> Result<Self> {
        let dir = scratch_dir("dev-bundle-source-")?;
        let files = copy_tree(source, dir.path())?;
        debug!(
            "Staged {} file(s) from {} into {}",
            files,
            source.display(),
            dir.path().display()
        );
        Ok(Self { dir, files })
    }

    /// Root of the staged copy.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Number of files copied when the tree was staged.
    pub fn staged_files(&self) -> usize {
        self.files
    }
}
