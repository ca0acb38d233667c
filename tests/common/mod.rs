//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a fixture that lays out a complete bundle workspace:
//! a source tree, a decompiled baseline, a git build-data checkout, the
//! required data files and a `dev-bundle.yaml` pointing at all of them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let Some(fixture) = BundleFixture::with_git() else { return };
//!     fixture.command().arg("generate").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::BundleFixture;
}

/// Configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Complete configuration matching the fixture layout.
    pub const BASE: &str = r#"
minecraft-version: "1.17.1"
mapped-server-coordinates: io.papermc.paper:dev-bundle:1.17.1-R0.1-SNAPSHOT
api-coordinates: io.papermc.paper:paper-api:1.17.1-R0.1-SNAPSHOT
mojang-api-coordinates: io.papermc.paper:paper-mojangapi:1.17.1-R0.1-SNAPSHOT
server-url: https://launcher.mojang.com/v1/objects/server.jar
source-dir: server/src/main/java
baseline: work/decompiled
build-data-dir: work/BuildData
spigot-data:
  class-mappings-file: mappings/bukkit-1.17.1-cl.csrg
  member-mappings-file: mappings/bukkit-1.17.1-members.csrg
  at-file: mappings/bukkit-1.17.1.at
reobf-mappings-file: work/reobf.tiny
mojang-mapped-paperclip-file: work/paperclip.jar
vanilla-jar-includes: ["/*.class", "/net/minecraft/**"]
vanilla-server-libraries:
  - com.google.guava:guava:21.0
  - io.netty:netty-all:4.1.50.Final
runtime-dependencies:
  - org.ow2.asm:asm:9.1
  - group: org.apache.logging.log4j
    name: log4j-core
    version: "2.14.1"
  - group: io.papermc.paper
    name: paper-api
    project: true
library-repositories: ["https://repo.maven.apache.org/maven2/"]
param-mappings:
  url: https://maven.fabricmc.net/
  dependencies: ["net.fabricmc:yarn:1.17.1+build.1:mergedv2"]
decompiler:
  url: https://maven.quiltmc.org/repository/release/
  dependencies: ["org.quiltmc:quiltflower:1.5.0"]
remapper:
  url: https://maven.fabricmc.net/
  dependencies: ["net.fabricmc:tiny-remapper:0.4.3:fat"]
"#;

    /// Relocation of the versioned craftbukkit package.
    pub const CRAFTBUKKIT_RELOCATION: &str = r#"
relocations:
  - from: org.bukkit.craftbukkit
    to: org.bukkit.craftbukkit.v1_17_R1
    excludes: ["org/bukkit/craftbukkit/v1_17_R1/Main.java"]
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "minecraft-version: [unclosed";
}

/// Whether a `git` binary is available.
pub fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// A temporary bundle workspace.
///
/// Sources go under `server/src/main/java`, the baseline under
/// `work/decompiled`.
pub struct BundleFixture {
    temp_dir: assert_fs::TempDir,
    config_extra: String,
}

#[allow(dead_code)]
impl BundleFixture {
    /// Create the workspace without initializing the build-data repository.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("server/src/main/java")
            .create_dir_all()
            .expect("Failed to create source dir");
        temp_dir
            .child("work/decompiled")
            .create_dir_all()
            .expect("Failed to create baseline dir");
        temp_dir
            .child("work/BuildData")
            .create_dir_all()
            .expect("Failed to create build data dir");
        temp_dir
            .child("work/reobf.tiny")
            .write_str("tiny\t2\t0\tmojang+yarn\tspigot\n")
            .expect("Failed to write mappings");
        temp_dir
            .child("work/paperclip.jar")
            .write_binary(b"PK\x03\x04paperclip")
            .expect("Failed to write paperclip");

        let fixture = Self {
            temp_dir,
            config_extra: String::new(),
        };
        fixture.write_config();
        fixture
    }

    /// Create the workspace with a committed build-data repository.
    ///
    /// Returns `None` when git is not installed.
    pub fn with_git() -> Option<Self> {
        if !git_available() {
            return None;
        }
        let fixture = Self::new();
        let dir = fixture.path().join("work/BuildData");
        git(&dir, &["init", "-q"]);
        git(&dir, &["config", "user.email", "dev@example.com"]);
        git(&dir, &["config", "user.name", "Dev"]);
        git(&dir, &["config", "commit.gpgsign", "false"]);
        git(
            &dir,
            &[
                "remote",
                "add",
                "origin",
                "https://hub.spigotmc.org/stash/scm/spigot/builddata.git",
            ],
        );
        std::fs::write(dir.join("info.json"), "{\"minecraftVersion\":\"1.17.1\"}")
            .expect("Failed to write build data");
        git(&dir, &["add", "info.json"]);
        git(&dir, &["commit", "-q", "-m", "Update to 1.17.1"]);
        Some(fixture)
    }

    /// Append YAML to the base configuration.
    pub fn with_config_extra(mut self, extra: &str) -> Self {
        self.config_extra.push_str(extra);
        self.write_config();
        self
    }

    /// Replace the configuration file entirely.
    pub fn with_raw_config(self, content: &str) -> Self {
        self.temp_dir
            .child("dev-bundle.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file to the working source tree.
    pub fn with_source(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("server/src/main/java")
            .child(path)
            .write_str(content)
            .expect("Failed to write source file");
        self
    }

    /// Add a file to the decompiled baseline.
    pub fn with_baseline(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("work/decompiled")
            .child(path)
            .write_str(content)
            .expect("Failed to write baseline file");
        self
    }

    /// Add an arbitrary file relative to the workspace root.
    pub fn with_file(self, path: &str, content: &[u8]) -> Self {
        self.temp_dir
            .child(path)
            .write_binary(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("dev-bundle.yaml")
    }

    /// Path of the default output archive.
    pub fn bundle_path(&self) -> PathBuf {
        self.temp_dir.path().join("dev-bundle.tar.gz")
    }

    /// Path of a file in the working source tree.
    pub fn source_path(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join("server/src/main/java").join(path)
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A command for the `dev-bundle` binary running in the workspace.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dev-bundle");
        cmd.current_dir(self.path())
            .env_remove("DEV_BUNDLE_CONFIG")
            .env("NO_COLOR", "1");
        cmd
    }

    fn write_config(&self) {
        self.temp_dir
            .child("dev-bundle.yaml")
            .write_str(&format!("{}{}", configs::BASE, self.config_extra))
            .expect("Failed to write config file");
    }
}

impl Default for BundleFixture {
    fn default() -> Self {
        Self::new()
    }
}
