//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `dev-bundle` library. It uses the `thiserror` library to create a single
//! `Error` enum covering every failure mode of bundle generation, with enough
//! context (offending path, command, field) to act on the message.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur while staging, diffing, or packaging a bundle.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library.
//!
//! The variants fall into four groups:
//!
//! - Configuration errors (`ConfigParse`, `MissingCoordinate`), raised before
//!   any output is touched.
//! - I/O errors (`Io`, `Filesystem`, `Archive`), always carrying the path that
//!   failed.
//! - Tool errors (`Diff`, `Vcs`), raised when a comparison or a `git` query
//!   cannot complete. A file that cannot be compared aborts the run; it is
//!   never skipped.
//! - Wrapped library errors (`Glob`, `Yaml`, `Json`).
//!
//! An empty diff is not an error. It is the signal to omit a patch and is
//! handled inside the tree differ.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dev-bundle operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing or validating the bundle configuration.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A dependency is missing one of the fields needed to build a Maven
    /// coordinate.
    #[error("Dependency '{dependency}' has no {field}; cannot build a Maven coordinate")]
    MissingCoordinate { dependency: String, field: String },

    /// A filesystem operation on a specific path failed.
    #[error("Filesystem operation error at '{}': {message}", path.display())]
    Filesystem { path: PathBuf, message: String },

    /// Two files could not be compared.
    #[error("Diff error for {path}: {message}")]
    Diff { path: String, message: String },

    /// A `git` query against the build-data checkout failed.
    #[error("Git command failed in '{}': {command} - {stderr}", dir.display())]
    Vcs {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// Writing or reading the bundle archive failed.
    #[error("Archive error at '{}': {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON encoding or decoding error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Build a `Filesystem` error for `path` from any displayable cause.
    pub fn fs(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Error::Filesystem {
            path: path.into(),
            message: cause.to_string(),
        }
    }

    /// Build an `Archive` error for `path` from any displayable cause.
    pub fn archive(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Error::Archive {
            path: path.into(),
            message: cause.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
