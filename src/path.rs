//! Path manipulation utilities for dev-bundle

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path};

/// Options used for every glob match against a relative path.
///
/// Matching is case-sensitive and `*` never crosses a `/`.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Match a `/`-separated relative path against a glob pattern
pub fn glob_match(pattern: &str, path: &str) -> Result<bool> {
    let pattern = Pattern::new(pattern).map_err(Error::Glob)?;
    Ok(pattern.matches_with(path, MATCH_OPTIONS))
}

/// Render `path` relative to `root` with `/` separators on every platform.
///
/// Returns `None` if `path` is not under `root`.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(segments.join("/"))
}

/// Join a `/`-separated relative path onto `root` using host separators
pub fn join_slash_path(root: &Path, relative: &str) -> std::path::PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

/// Check whether `path` lies under the directory prefix `prefix`.
///
/// Both are `/`-separated. The prefix must end on a segment boundary, so
/// `a/b` is a prefix of `a/b/C.java` but not of `a/bc/C.java`.
pub fn has_dir_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return false;
    }
    path.len() > prefix.len() && path.starts_with(prefix) && path.as_bytes()[prefix.len()] == b'/'
}
