//! The read-only decompiled baseline that staged sources are diffed against.
//!
//! A baseline is either a plain directory or a tar archive (optionally
//! gzip-compressed). Archives are unpacked once into a scratch directory that
//! lives as long as the [`BaselineTree`] value. Nothing in this module writes
//! to a baseline after it has been opened.

use crate::error::{Error, Result};
use crate::filesystem::scratch_dir;
use crate::path::join_slash_path;
use flate2::read::GzDecoder;
use log::info;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A baseline tree opened for lookups.
#[derive(Debug)]
pub enum BaselineTree {
    /// A directory used in place.
    Directory(PathBuf),
    /// An archive unpacked into an owned scratch directory.
    Mounted { archive: PathBuf, dir: TempDir },
}

impl BaselineTree {
    /// Open a baseline from a directory or a `.tar`, `.tar.gz` or `.tgz` file.
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(BaselineTree::Directory(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(Error::fs(path, "baseline does not exist"));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let file = File::open(path).map_err(|e| Error::fs(path, e))?;
        let reader: Box<dyn Read> = if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else if name.ends_with(".tar") {
            Box::new(BufReader::new(file))
        } else {
            return Err(Error::fs(
                path,
                "unsupported baseline format (expected a directory, .tar, .tar.gz or .tgz)",
            ));
        };

        let dir = scratch_dir("dev-bundle-baseline-")?;
        tar::Archive::new(reader)
            .unpack(dir.path())
            .map_err(|e| Error::archive(path, e))?;
        info!("Mounted baseline {}", path.display());

        Ok(BaselineTree::Mounted {
            archive: path.to_path_buf(),
            dir,
        })
    }

    /// Root directory that relative paths resolve against.
    pub fn root(&self) -> &Path {
        match self {
            BaselineTree::Directory(root) => root,
            BaselineTree::Mounted { dir, .. } => dir.path(),
        }
    }

    /// Path where the baseline was opened from.
    pub fn source(&self) -> &Path {
        match self {
            BaselineTree::Directory(root) => root,
            BaselineTree::Mounted { archive, .. } => archive,
        }
    }

    /// Resolve a `/`-separated relative path to a baseline file, if present.
    pub fn lookup(&self, relative: &str) -> Option<PathBuf> {
        let candidate = join_slash_path(self.root(), relative);
        candidate.is_file().then_some(candidate)
    }
}
