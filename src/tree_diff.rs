//! # Tree Differencing
//!
//! Compares a staged source tree against a baseline tree and materializes
//! the result into an output directory:
//!
//! | Baseline counterpart | Diff        | Classification | Output                     |
//! |----------------------|-------------|----------------|----------------------------|
//! | missing              | n/a         | `New`          | `<path>` (verbatim copy)   |
//! | present              | non-blank   | `Patched`      | `<path>.patch`             |
//! | present              | blank       | `Unchanged`    | nothing                    |
//!
//! Classification and diff computation run in parallel. Outputs are then
//! written by a single writer in sorted path order.

use crate::baseline::BaselineTree;
use crate::diff::diff_file_texts;
use crate::error::{Error, Result};
use crate::filesystem;
use crate::path::{join_slash_path, relative_slash_path};
use log::{debug, info};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the relative path of a generated patch.
pub const PATCH_SUFFIX: &str = ".patch";

/// How a staged file relates to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileClassification {
    /// No baseline counterpart; copied verbatim.
    New,
    /// Differs from its baseline counterpart; emitted as a patch.
    Patched,
    /// Identical to its baseline counterpart; omitted.
    Unchanged,
}

/// The classification of one staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    /// `/`-separated path relative to the staged tree root.
    pub relative_path: String,
    pub classification: FileClassification,
}

impl ClassifiedFile {
    /// Relative path of the entry written to the output, if any.
    pub fn output_path(&self) -> Option<String> {
        match self.classification {
            FileClassification::New => Some(self.relative_path.clone()),
            FileClassification::Patched => Some(format!("{}{}", self.relative_path, PATCH_SUFFIX)),
            FileClassification::Unchanged => None,
        }
    }
}

/// The full result of a tree comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    /// Every staged file, sorted by relative path.
    pub files: Vec<ClassifiedFile>,
}

impl TreeDiff {
    /// Number of files with the given classification.
    pub fn count(&self, classification: FileClassification) -> usize {
        self.files
            .iter()
            .filter(|f| f.classification == classification)
            .count()
    }

    /// Relative output paths written, in sorted order.
    pub fn outputs(&self) -> Vec<String> {
        self.files.iter().filter_map(|f| f.output_path()).collect()
    }
}

/// What to write for one file.
enum Output {
    Copy(PathBuf),
    Patch(String),
    Nothing,
}

/// Classify one staged file and compute its output.
fn classify(
    baseline: &BaselineTree,
    staged: &Path,
    relative: &str,
) -> Result<(FileClassification, Output)> {
    let Some(original) = baseline.lookup(relative) else {
        return Ok((FileClassification::New, Output::Copy(staged.to_path_buf())));
    };

    let old_bytes = fs::read(&original).map_err(|e| Error::fs(&original, e))?;
    let new_bytes = fs::read(staged).map_err(|e| Error::fs(staged, e))?;
    if old_bytes == new_bytes {
        return Ok((FileClassification::Unchanged, Output::Nothing));
    }

    let old = String::from_utf8(old_bytes).map_err(|_| Error::Diff {
        path: relative.to_string(),
        message: "baseline file is not valid UTF-8 text".to_string(),
    })?;
    let new = String::from_utf8(new_bytes).map_err(|_| Error::Diff {
        path: relative.to_string(),
        message: "staged file is not valid UTF-8 text".to_string(),
    })?;

    let patch = diff_file_texts(relative, &old, &new);
    if patch.trim().is_empty() {
        Ok((FileClassification::Unchanged, Output::Nothing))
    } else {
        Ok((FileClassification::Patched, Output::Patch(patch)))
    }
}

/// Compare `source_root` against `baseline`, writing results under `output`.
///
/// `output` is created if needed. Any failure to read or compare a file aborts
/// the whole comparison.
pub fn diff_trees(source_root: &Path, baseline: &BaselineTree, output: &Path) -> Result<TreeDiff> {
    let files = filesystem::list_files(source_root)?;

    let mut results = files
        .par_iter()
        .map(|staged| {
            let relative = relative_slash_path(source_root, staged)
                .ok_or_else(|| Error::fs(staged, "file is outside the staged tree"))?;
            let (classification, out) = classify(baseline, staged, &relative)?;
            Ok((relative, classification, out))
        })
        .collect::<Result<Vec<_>>>()?;
    results.sort_by(|a, b| a.0.cmp(&b.0));

    fs::create_dir_all(output).map_err(|e| Error::fs(output, e))?;

    let mut diff = TreeDiff::default();
    for (relative, classification, out) in results {
        debug!("{:?}: {}", classification, relative);
        match out {
            Output::Copy(staged) => {
                let target = join_slash_path(output, &relative);
                create_parent(&target)?;
                fs::copy(&staged, &target).map_err(|e| Error::fs(&target, e))?;
            }
            Output::Patch(text) => {
                let target = join_slash_path(output, &format!("{relative}{PATCH_SUFFIX}"));
                create_parent(&target)?;
                fs::write(&target, text).map_err(|e| Error::fs(&target, e))?;
            }
            Output::Nothing => {}
        }
        diff.files.push(ClassifiedFile {
            relative_path: relative,
            classification,
        });
    }

    info!(
        "Compared {} file(s) against {}: {} new, {} patched, {} unchanged",
        diff.files.len(),
        baseline.source().display(),
        diff.count(FileClassification::New),
        diff.count(FileClassification::Patched),
        diff.count(FileClassification::Unchanged)
    );
    Ok(diff)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
    }
    Ok(())
}
