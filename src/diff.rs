//! Unified diff generation.
//!
//! [`unified_diff`] is a pure function over two texts. The output follows
//! `diff -u` conventions: `---`/`+++` headers carrying the given labels, hunks
//! with 3 lines of context, and a `\ No newline at end of file` marker where
//! needed. Inputs are normalized to `\n` line endings first, so the result
//! does not depend on the host platform.

use similar::TextDiff;
use std::borrow::Cow;

/// Lines of context around each hunk.
pub const CONTEXT_LINES: usize = 3;

/// Replace `\r\n` and lone `\r` line endings with `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Diff `old` against `new`, labelling the sides `old_label` and `new_label`.
///
/// Returns an empty string when the texts are equal after normalization.
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    let old = normalize_line_endings(old);
    let new = normalize_line_endings(new);
    if old == new {
        return String::new();
    }

    TextDiff::from_lines(old.as_ref(), new.as_ref())
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(old_label, new_label)
        .to_string()
}

/// Diff two versions of the file at `relative`, labelled `a/...` and `b/...`.
pub fn diff_file_texts(relative: &str, old: &str, new: &str) -> String {
    unified_diff(old, new, &format!("a/{relative}"), &format!("b/{relative}"))
}
