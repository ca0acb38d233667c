//! Property-based tests for relocation reversal and path helpers.
//!
//! These tests use proptest to generate random packages, paths and text and
//! verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{has_dir_prefix, join_slash_path, relative_slash_path};
    use crate::relocation::{Relocation, RelocationRewriter};
    use proptest::prelude::*;
    use std::path::Path;

    fn package() -> impl Strategy<Value = String> {
        "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}"
    }

    fn relative_path() -> impl Strategy<Value = String> {
        "[a-z]{1,8}(/[a-z]{1,8}){0,4}"
    }

    // ============================================================================
    // rewrite_text property tests
    // ============================================================================

    proptest! {
        /// Property: text that never mentions a relocated package is untouched
        #[test]
        fn rewrite_text_leaves_unrelated_text(
            text in "[a-z ;.\n]{0,64}",
            from in package(),
            suffix in "V[0-9]{1,3}",
        ) {
            let to = format!("{from}.{suffix}");
            let rewriter = RelocationRewriter::new(&[Relocation::new(from, to)]).unwrap();
            prop_assert_eq!(rewriter.rewrite_text(&text), text);
        }

        /// Property: an import of a relocated class points back at the original package
        #[test]
        fn rewrite_text_restores_import(
            from in package(),
            suffix in "v[0-9]{1,3}",
            class in "[A-Z][a-zA-Z]{0,10}",
        ) {
            let to = format!("{from}.{suffix}");
            let rewriter = RelocationRewriter::new(&[Relocation::new(from.clone(), to.clone())]).unwrap();

            let rewritten = rewriter.rewrite_text(&format!("import {to}.{class};\n"));
            prop_assert_eq!(rewritten, format!("import {from}.{class};\n"));
        }

        /// Property: slash and dot forms are both restored
        #[test]
        fn rewrite_text_restores_both_forms(
            from in package(),
            suffix in "v[0-9]{1,3}",
        ) {
            let to = format!("{from}.{suffix}");
            let rewriter = RelocationRewriter::new(&[Relocation::new(from.clone(), to.clone())]).unwrap();

            let text = format!("\"{}/X\" {}.X", to.replace('.', "/"), to);
            let expected = format!("\"{}/X\" {}.X", from.replace('.', "/"), from);
            prop_assert_eq!(rewriter.rewrite_text(&text), expected);
        }

        /// Property: rewriting already-reversed text changes nothing
        #[test]
        fn rewrite_text_is_idempotent(
            from in package(),
            suffix in "v[0-9]{1,3}",
            class in "[A-Z][a-zA-Z]{0,10}",
        ) {
            let to = format!("{from}.{suffix}");
            let rewriter = RelocationRewriter::new(&[Relocation::new(from, to.clone())]).unwrap();

            let once = rewriter.rewrite_text(&format!("import {to}.{class};\n{}/{class}\n", to.replace('.', "/")));
            prop_assert_eq!(rewriter.rewrite_text(&once), once);
        }

        /// Property: rewriting is deterministic
        #[test]
        fn rewrite_text_is_deterministic(
            text in ".{0,64}",
            from in package(),
            to in package(),
        ) {
            prop_assume!(from != to);
            let rewriter = RelocationRewriter::new(&[Relocation::new(from, to)]).unwrap();
            prop_assert_eq!(rewriter.rewrite_text(&text), rewriter.rewrite_text(&text));
        }
    }

    // ============================================================================
    // destination_for property tests
    // ============================================================================

    proptest! {
        /// Property: a file under the relocated package moves under the original package
        #[test]
        fn destination_for_maps_relocated_paths(
            from in package(),
            to in package(),
            rest in relative_path(),
        ) {
            prop_assume!(from != to);
            let rewriter = RelocationRewriter::new(&[Relocation::new(from.clone(), to.clone())]).unwrap();

            let relative = format!("{}/{rest}.java", to.replace('.', "/"));
            let expected = format!("{}/{rest}.java", from.replace('.', "/"));
            prop_assert_eq!(rewriter.destination_for(&relative), Some(expected));
        }

        /// Property: a sibling directory sharing a name prefix is never moved
        #[test]
        fn destination_for_respects_segment_boundary(
            from in package(),
            to in package(),
            tail in "[a-z]{1,4}",
        ) {
            prop_assume!(from != to);
            let rewriter = RelocationRewriter::new(&[Relocation::new(from, to.clone())]).unwrap();

            let relative = format!("{}{tail}/Main.java", to.replace('.', "/"));
            prop_assert_eq!(rewriter.destination_for(&relative), None);
        }

        /// Property: an excluded file is never moved
        #[test]
        fn destination_for_honors_excludes(
            from in package(),
            to in package(),
            rest in relative_path(),
        ) {
            prop_assume!(from != to);
            let relative = format!("{}/{rest}.java", to.replace('.', "/"));
            let rule = Relocation::new(from, to).exclude(relative.clone());
            let rewriter = RelocationRewriter::new(&[rule]).unwrap();

            prop_assert_eq!(rewriter.destination_for(&relative), None);
        }
    }

    // ============================================================================
    // path helper property tests
    // ============================================================================

    proptest! {
        /// Property: joining then relativizing a slash path is lossless
        #[test]
        fn slash_path_join_round_trips(relative in relative_path()) {
            let root = Path::new("/stage");
            let joined = join_slash_path(root, &relative);
            prop_assert_eq!(relative_slash_path(root, &joined), Some(relative));
        }

        /// Property: a path is never its own directory prefix
        #[test]
        fn has_dir_prefix_is_strict(path in relative_path()) {
            prop_assert!(!has_dir_prefix(&path, &path));
        }

        /// Property: every parent directory is a prefix
        #[test]
        fn has_dir_prefix_accepts_parents(parent in relative_path(), child in relative_path()) {
            let path = format!("{parent}/{child}");
            prop_assert!(has_dir_prefix(&path, &parent));
        }
    }
}
