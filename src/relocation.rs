//! # Relocation Reversal
//!
//! Sources in the working tree have had some package namespaces relocated
//! (for example `org.bukkit.craftbukkit` moved under a versioned package).
//! Before the tree can be diffed against the decompiled baseline, every
//! relocation has to be undone, both in file contents and in file locations.
//!
//! ## Text rewriting
//!
//! Rules are applied in two passes so that overlapping rules cannot feed into
//! each other. The first pass replaces every occurrence of each rule's target
//! package (dot and slash forms) with a token unique to that rule. The second
//! pass replaces each token with the rule's original package. No original
//! package text is reintroduced until every target has been neutralized, so a
//! rule whose target is a substring of another rule's source is safe.
//!
//! ## File moves
//!
//! A file whose relative path lies under a rule's target package moves to the
//! matching location under the original package. The first rule (in list
//! order) whose target is a prefix decides. If that rule excludes the file it
//! stays where it is; later rules are not consulted. Moves go through a
//! holding directory so a file moved into place is never picked up again by
//! another move in the same run.

use crate::error::{Error, Result};
use crate::filesystem;
use crate::path::{has_dir_prefix, join_slash_path, relative_slash_path, MATCH_OPTIONS};
use glob::Pattern;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// Directory used to hold files between the two phases of a move.
const HOLDING_DIR: &str = ".dev-bundle-relocating";

/// A single relocation rule.
///
/// The working tree contains `to_package`; the baseline contains
/// `from_package`. Identity is the `(from_package, to_package)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relocation {
    /// Library whose classes were absorbed by this relocation, if any.
    ///
    /// Libraries matching this coordinate are dropped from the bundle's
    /// external dependency list.
    #[serde(
        default,
        alias = "owning-library-coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    pub owning_library_coordinates: Option<String>,
    /// Original package, as found in the baseline.
    #[serde(alias = "from")]
    pub from_package: String,
    /// Relocated package, as found in the working tree.
    #[serde(alias = "to")]
    pub to_package: String,
    /// Paths exempt from the file move step.
    ///
    /// Entries containing `*`, `?` or `[` are globs matched against the
    /// `/`-separated relative path. Other entries are package or path
    /// prefixes (`a.b.Excluded` excludes `a/b/Excluded.java`).
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl Relocation {
    /// Create a rule with no excludes and no owning library.
    pub fn new(from_package: impl Into<String>, to_package: impl Into<String>) -> Self {
        Self {
            owning_library_coordinates: None,
            from_package: from_package.into(),
            to_package: to_package.into(),
            excludes: Vec::new(),
        }
    }

    /// Add an exclude entry.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Set the owning library coordinate.
    pub fn owned_by(mut self, coordinates: impl Into<String>) -> Self {
        self.owning_library_coordinates = Some(coordinates.into());
        self
    }
}

/// Matcher for one `excludes` entry.
#[derive(Debug, Clone)]
enum ExcludeMatcher {
    Glob(Pattern),
    Prefix(String),
}

impl ExcludeMatcher {
    fn parse(entry: &str) -> Result<Self> {
        if entry.contains(['*', '?', '[']) {
            return Ok(ExcludeMatcher::Glob(Pattern::new(entry)?));
        }
        if entry.contains('/') {
            Ok(ExcludeMatcher::Prefix(entry.to_string()))
        } else {
            Ok(ExcludeMatcher::Prefix(entry.replace('.', "/")))
        }
    }

    fn matches(&self, relative: &str) -> bool {
        match self {
            ExcludeMatcher::Glob(pattern) => pattern.matches_with(relative, MATCH_OPTIONS),
            ExcludeMatcher::Prefix(prefix) => {
                relative == prefix.as_str() || has_dir_prefix(relative, prefix)
            }
        }
    }
}

/// A relocation with its derived forms and placeholder tokens.
#[derive(Debug, Clone)]
struct PreparedRule {
    from_dot: String,
    from_slash: String,
    to_dot: String,
    to_slash: String,
    dot_token: String,
    slash_token: String,
    excludes: Vec<ExcludeMatcher>,
}

impl PreparedRule {
    fn new(index: usize, relocation: &Relocation) -> Result<Self> {
        let from_dot = relocation.from_package.replace('/', ".");
        let to_dot = relocation.to_package.replace('/', ".");
        if from_dot.trim().is_empty() || to_dot.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: format!(
                    "Relocation #{} has an empty package ('{}' -> '{}')",
                    index + 1,
                    relocation.from_package,
                    relocation.to_package
                ),
                hint: Some("Both 'from' and 'to' must name a package".to_string()),
            });
        }

        let hash = rule_hash(&from_dot, &to_dot);
        let excludes = relocation
            .excludes
            .iter()
            .map(|e| ExcludeMatcher::parse(e))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            from_slash: from_dot.replace('.', "/"),
            to_slash: to_dot.replace('.', "/"),
            from_dot,
            to_dot,
            dot_token: placeholder(index, hash, 'd'),
            slash_token: placeholder(index, hash, 's'),
            excludes,
        })
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.excludes.iter().any(|e| e.matches(relative))
    }
}

/// Stable hash of a rule's identity.
fn rule_hash(from_dot: &str, to_dot: &str) -> u64 {
    let mut key = Vec::with_capacity(from_dot.len() + to_dot.len() + 1);
    key.extend_from_slice(from_dot.as_bytes());
    key.push(0);
    key.extend_from_slice(to_dot.as_bytes());
    xxh3_64(&key)
}

/// Placeholder token for one form of one rule.
///
/// Every character of the token is a private-use code point, so no package
/// text can match inside it. Keyed by rule index so tokens are distinct
/// within a run.
fn placeholder(index: usize, hash: u64, form: char) -> String {
    let body = format!("{index:x}:{hash:016x}:{form}");
    let mut token = String::with_capacity(body.len() * 3 + 6);
    token.push('\u{E000}');
    token.extend(body.chars().map(private_use));
    token.push('\u{E001}');
    token
}

/// Shift an ASCII character into the private-use block at U+E100.
fn private_use(c: char) -> char {
    char::from_u32(0xE100 + (c as u32 & 0x7F)).unwrap_or('\u{E0FF}')
}

/// Summary of one rewrite run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationReport {
    /// Files whose contents changed.
    pub files_rewritten: usize,
    /// Files moved to their original package location.
    pub files_moved: usize,
    /// Files left untouched because they are not UTF-8 text.
    pub files_skipped: usize,
    /// Moves that replaced an existing file at the destination.
    pub overwritten: usize,
}

/// Reverses a list of relocations over text and over a directory tree.
#[derive(Debug, Clone)]
pub struct RelocationRewriter {
    rules: Vec<PreparedRule>,
}

impl RelocationRewriter {
    /// Prepare a rewriter for `relocations`, applied in the given order.
    pub fn new(relocations: &[Relocation]) -> Result<Self> {
        let rules = relocations
            .iter()
            .enumerate()
            .map(|(i, r)| PreparedRule::new(i, r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Number of rules in this rewriter.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether this rewriter has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replace every relocated package in `text` with its original package.
    pub fn rewrite_text(&self, text: &str) -> String {
        let mut content = text.to_string();

        // A single-segment target has identical forms; it restores to the
        // dot form.
        for rule in &self.rules {
            content = content.replace(&rule.to_dot, &rule.dot_token);
            if rule.to_slash != rule.to_dot {
                content = content.replace(&rule.to_slash, &rule.slash_token);
            }
        }

        for rule in &self.rules {
            content = content.replace(&rule.slash_token, &rule.from_slash);
            content = content.replace(&rule.dot_token, &rule.from_dot);
        }

        content
    }

    /// Destination for a `/`-separated relative path, or `None` if it stays.
    pub fn destination_for(&self, relative: &str) -> Option<String> {
        let rule = self
            .rules
            .iter()
            .find(|rule| has_dir_prefix(relative, &rule.to_slash))?;
        if rule.is_excluded(relative) {
            return None;
        }
        Some(format!(
            "{}{}",
            rule.from_slash,
            &relative[rule.to_slash.len()..]
        ))
    }

    /// Reverse relocations in every file under `root`, then move files.
    ///
    /// `root` is rewritten in place. Non-UTF-8 files keep their contents but
    /// are still moved.
    pub fn rewrite_tree(&self, root: &Path) -> Result<RelocationReport> {
        let mut report = RelocationReport::default();
        if self.rules.is_empty() {
            return Ok(report);
        }

        let files = filesystem::list_files(root)?;
        let outcomes = files
            .par_iter()
            .map(|path| self.rewrite_file(path))
            .collect::<Result<Vec<_>>>()?;
        for outcome in outcomes {
            match outcome {
                FileOutcome::Rewritten => report.files_rewritten += 1,
                FileOutcome::Skipped => report.files_skipped += 1,
                FileOutcome::Unchanged => {}
            }
        }

        let (moved, overwritten) = self.move_files(root, &files)?;
        report.files_moved = moved;
        report.overwritten = overwritten;

        info!(
            "Reversed {} relocation(s): {} file(s) rewritten, {} moved",
            self.rules.len(),
            report.files_rewritten,
            report.files_moved
        );
        Ok(report)
    }

    fn rewrite_file(&self, path: &Path) -> Result<FileOutcome> {
        let bytes = fs::read(path).map_err(|e| Error::fs(path, e))?;
        let Ok(text) = String::from_utf8(bytes) else {
            debug!("Skipping non-UTF-8 file {}", path.display());
            return Ok(FileOutcome::Skipped);
        };

        let rewritten = self.rewrite_text(&text);
        if rewritten == text {
            return Ok(FileOutcome::Unchanged);
        }
        fs::write(path, rewritten).map_err(|e| Error::fs(path, e))?;
        Ok(FileOutcome::Rewritten)
    }

    fn move_files(&self, root: &Path, files: &[PathBuf]) -> Result<(usize, usize)> {
        let plan: Vec<(PathBuf, PathBuf)> = files
            .iter()
            .filter_map(|path| {
                let relative = relative_slash_path(root, path)?;
                let destination = self.destination_for(&relative)?;
                debug!("Relocating {} -> {}", relative, destination);
                Some((path.clone(), join_slash_path(root, &destination)))
            })
            .collect();

        if plan.is_empty() {
            return Ok((0, 0));
        }

        let holding = root.join(HOLDING_DIR);
        fs::create_dir_all(&holding).map_err(|e| Error::fs(&holding, e))?;

        for (index, (source, _)) in plan.iter().enumerate() {
            let held = holding.join(index.to_string());
            fs::rename(source, &held).map_err(|e| Error::fs(source, e))?;
        }

        let mut placed = HashSet::new();
        let mut overwritten = 0;
        for (index, (_, destination)) in plan.iter().enumerate() {
            let held = holding.join(index.to_string());
            if destination.exists() {
                // Last mover wins.
                let earlier = if placed.contains(destination) {
                    "another relocated file"
                } else {
                    "an existing file"
                };
                warn!(
                    "Relocation destination {} already holds {}; overwriting",
                    destination.display(),
                    earlier
                );
                fs::remove_file(destination).map_err(|e| Error::fs(destination, e))?;
                overwritten += 1;
            }
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
            }
            fs::rename(&held, destination).map_err(|e| Error::fs(destination, e))?;
            placed.insert(destination.clone());
        }

        fs::remove_dir_all(&holding).map_err(|e| Error::fs(&holding, e))?;
        Ok((plan.len(), overwritten))
    }
}

enum FileOutcome {
    Rewritten,
    Unchanged,
    Skipped,
}
