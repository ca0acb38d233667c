//! # Dev Bundle Library
//!
//! This library builds "dev bundles": self-describing archives that let a
//! downstream build reproduce a modified game server's development
//! environment from vanilla inputs. It is designed to be used by the
//! `dev-bundle` command-line tool but can also be driven directly.
//!
//! ## Quick Example
//!
//! ```
//! use dev_bundle::relocation::{Relocation, RelocationRewriter};
//!
//! let rules = vec![Relocation::new("org.bukkit.craftbukkit", "org.bukkit.craftbukkit.v1_17_R1")];
//! let rewriter = RelocationRewriter::new(&rules).unwrap();
//!
//! assert_eq!(
//!     rewriter.rewrite_text("import org.bukkit.craftbukkit.v1_17_R1.CraftServer;"),
//!     "import org.bukkit.craftbukkit.CraftServer;"
//! );
//! assert_eq!(
//!     rewriter.destination_for("org/bukkit/craftbukkit/v1_17_R1/CraftServer.java").as_deref(),
//!     Some("org/bukkit/craftbukkit/CraftServer.java")
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The `dev-bundle.yaml` schema.
//! - **Relocation (`relocation`)**: Undoes package relocations in a staged copy
//!   of the source tree, both in file contents and in file locations.
//! - **Differencing (`diff`, `tree_diff`, `baseline`)**: Compares the staged
//!   tree against the decompiled baseline and emits unified diffs and new files.
//! - **Coordinates (`coordinates`)**: Turns dependency declarations into Maven
//!   coordinate strings and computes the declared library set.
//! - **Manifest (`manifest`, `git`)**: Assembles `config.json`.
//! - **Packaging (`bundle`)**: Runs the pipeline and writes the archive.
//!
//! ## Execution Flow
//!
//! [`bundle::BundlePackager::run`] executes these steps:
//!
//! 1.  **Manifest**: Resolve coordinates and read build-data provenance.
//! 2.  **Stage**: Copy the source tree into a scratch directory.
//! 3.  **Relocate**: Reverse relocations inside the staged copy.
//! 4.  **Diff**: Classify each staged file as new, patched or unchanged.
//! 5.  **Write**: Emit the deterministic archive and publish it atomically.

pub mod baseline;
pub mod bundle;
pub mod config;
pub mod coordinates;
pub mod defaults;
pub mod diff;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod manifest;
pub mod output;
pub mod path;
pub mod relocation;
pub mod suggestions;
pub mod tree_diff;

#[cfg(test)]
mod relocation_proptest;
