//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dev_bundle::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use crate::error::Error;
use std::path::Path;

/// Generate an error for when the configuration file is not found.
///
/// Includes hints about:
/// - Creating a new config file
/// - Using the -c/--config flag
/// - Using the DEV_BUNDLE_CONFIG environment variable
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a dev-bundle.yaml file next to the server project\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set DEV_BUNDLE_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for when a bundle archive to inspect is not found.
pub fn bundle_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Bundle not found: {path}\n\n\
         hint: Run 'dev-bundle generate' to create it\n\
         hint: Pass the archive path as the first argument",
        path = path.display()
    )
}

/// Attach hints to a library error where a common fix exists.
pub fn with_hint(error: Error) -> anyhow::Error {
    let hint = match &error {
        Error::Vcs { .. } => {
            Some("hint: 'build-data-dir' must be a git clone with an 'origin' remote and at least one commit")
        }
        Error::MissingCoordinate { .. } => Some(
            "hint: Give the dependency a version, either in 'group:name:version' notation or as 'version:'",
        ),
        Error::Diff { .. } => {
            Some("hint: Only text files can be patched; remove binary changes from the source tree")
        }
        _ => None,
    };
    match hint {
        Some(hint) => anyhow::anyhow!("{error}\n\n{hint}"),
        None => anyhow::Error::new(error),
    }
}
