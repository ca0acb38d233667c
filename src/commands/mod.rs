//! # CLI Command Implementations
//!
//! Each subcommand of the `dev-bundle` command-line tool lives in its own
//! file and contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `dev_bundle` library.

use anyhow::Result;
use std::path::{Path, PathBuf};

use dev_bundle::config::{self, BundleConfig};
use dev_bundle::defaults;
use dev_bundle::suggestions;

pub mod completions;
pub mod generate;
pub mod inspect;
pub mod validate;

/// Resolve the configuration path, defaulting to `dev-bundle.yaml`.
pub fn config_path(config: Option<PathBuf>) -> PathBuf {
    config.unwrap_or_else(|| PathBuf::from(defaults::CONFIG_FILE))
}

/// Load a configuration, turning a missing file into a hinted error.
pub fn load_config(path: &Path) -> Result<BundleConfig> {
    if !path.exists() {
        return Err(suggestions::config_not_found(path));
    }
    config::from_file(path).map_err(suggestions::with_hint)
}
