//! # Configuration Schema and Parsing
//!
//! This module defines the `dev-bundle.yaml` configuration file: every input
//! the bundle generator needs, from the source and baseline trees to the
//! coordinates recorded in the manifest.
//!
//! ## Key Components
//!
//! - **`BundleConfig`**: The whole configuration. Relative paths resolve
//!   against the directory containing the configuration file.
//! - **`RunnerConfig` / `MavenDepConfig`**: Maven repositories and dependencies
//!   for the external tools a consumer runs (decompiler, remapper, parameter
//!   mappings).
//! - **`SpigotDataConfig`**: Paths inside the build-data checkout.
//!
//! ## Example
//!
//! ```yaml
//! minecraft-version: "1.17.1"
//! mapped-server-coordinates: io.papermc.paper:paper-server:userdev-1.17.1-R0.1-SNAPSHOT
//! api-coordinates: io.papermc.paper:paper-api:1.17.1-R0.1-SNAPSHOT
//! mojang-api-coordinates: io.papermc.paper:paper-mojangapi:1.17.1-R0.1-SNAPSHOT
//! server-url: https://launcher.mojang.com/v1/objects/server.jar
//! source-dir: Paper-Server/src/main/java
//! baseline: work/decompiled.tar.gz
//! build-data-dir: work/BuildData
//! spigot-data:
//!   class-mappings-file: mappings/bukkit-1.17.1-cl.csrg
//!   member-mappings-file: mappings/bukkit-1.17.1-members.csrg
//!   at-file: mappings/bukkit-1.17.1.at
//! reobf-mappings-file: work/reobf.tiny
//! mojang-mapped-paperclip-file: work/paperclip.jar
//! relocations:
//!   - from: org.bukkit.craftbukkit
//!     to: org.bukkit.craftbukkit.v1_17_R1
//! param-mappings:
//!   url: https://maven.fabricmc.net/
//!   dependencies: ["net.fabricmc:yarn:1.17.1+build.1:mergedv2"]
//! decompiler:
//!   url: https://maven.quiltmc.org/repository/release/
//!   dependencies: ["org.quiltmc:quiltflower:1.5.0"]
//! remapper:
//!   url: https://maven.fabricmc.net/
//!   dependencies: ["net.fabricmc:tiny-remapper:0.4.3:fat"]
//! ```

use crate::coordinates::DependencySpec;
use crate::defaults;
use crate::error::{Error, Result};
use crate::relocation::{Relocation, RelocationRewriter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A Maven repository and the dependencies fetched from it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MavenDepConfig {
    /// Repository URL.
    pub url: String,
    /// Dependencies as notation strings or detailed tables.
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

/// An external tool: where to fetch it and how to invoke it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunnerConfig {
    /// Repository URL.
    pub url: String,
    /// Dependencies as notation strings or detailed tables.
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
    /// Argument list. Falls back to the built-in list for the tool.
    #[serde(default)]
    pub args: Option<Vec<String>>,
}

/// Paths to mapping and access-transformer files inside the build-data checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpigotDataConfig {
    pub class_mappings_file: String,
    pub member_mappings_file: String,
    pub at_file: String,
}

/// The complete bundle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BundleConfig {
    /// Target game version.
    pub minecraft_version: String,
    /// Coordinate under which the mapped server is published.
    pub mapped_server_coordinates: String,
    pub api_coordinates: String,
    pub mojang_api_coordinates: String,
    /// Where consumers download the vanilla server jar.
    pub server_url: String,

    /// Working source tree with relocations applied.
    pub source_dir: PathBuf,
    /// Decompiled baseline: a directory or a tar archive.
    pub baseline: PathBuf,
    /// Build-data checkout providing spigot provenance.
    pub build_data_dir: PathBuf,
    pub spigot_data: SpigotDataConfig,

    pub reobf_mappings_file: PathBuf,
    pub mojang_mapped_paperclip_file: PathBuf,
    #[serde(default)]
    pub additional_spigot_class_mappings_file: Option<PathBuf>,
    #[serde(default)]
    pub additional_spigot_member_mappings_file: Option<PathBuf>,
    #[serde(default)]
    pub mappings_patch_file: Option<PathBuf>,

    /// Globs selecting vanilla jar entries consumers should keep.
    #[serde(default)]
    pub vanilla_jar_includes: Vec<String>,
    /// Libraries the vanilla server ships with, as coordinate strings.
    #[serde(default)]
    pub vanilla_server_libraries: Vec<String>,
    /// Runtime dependencies of the server project.
    #[serde(default)]
    pub runtime_dependencies: Vec<DependencySpec>,
    #[serde(default)]
    pub library_repositories: Vec<String>,
    #[serde(default)]
    pub relocations: Vec<Relocation>,

    pub param_mappings: MavenDepConfig,
    pub decompiler: RunnerConfig,
    pub remapper: RunnerConfig,
    /// Overrides the arguments recorded for remapping plugins.
    #[serde(default)]
    pub plugin_remap_args: Option<Vec<String>>,

    /// Output archive path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Directory relative paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_FILE)
}

impl BundleConfig {
    /// Resolve a configured path against the configuration directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Arguments for the decompiler runner.
    pub fn decompiler_args(&self) -> Vec<String> {
        self.decompiler
            .args
            .clone()
            .unwrap_or_else(defaults::decompiler_args)
    }

    /// Arguments for the remapper runner.
    pub fn remapper_args(&self) -> Vec<String> {
        self.remapper
            .args
            .clone()
            .unwrap_or_else(defaults::remapper_args)
    }

    /// Arguments recorded for remapping plugins.
    pub fn plugin_remap_args(&self) -> Vec<String> {
        self.plugin_remap_args
            .clone()
            .unwrap_or_else(defaults::plugin_remap_args)
    }

    /// Check values that serde cannot: non-blank strings and valid rules.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("minecraft-version", &self.minecraft_version),
            ("mapped-server-coordinates", &self.mapped_server_coordinates),
            ("api-coordinates", &self.api_coordinates),
            ("mojang-api-coordinates", &self.mojang_api_coordinates),
            ("server-url", &self.server_url),
            ("param-mappings.url", &self.param_mappings.url),
            ("decompiler.url", &self.decompiler.url),
            ("remapper.url", &self.remapper.url),
            ("spigot-data.class-mappings-file", &self.spigot_data.class_mappings_file),
            ("spigot-data.member-mappings-file", &self.spigot_data.member_mappings_file),
            ("spigot-data.at-file", &self.spigot_data.at_file),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("'{key}' must not be empty"),
                    hint: None,
                });
            }
        }

        for pattern in &self.vanilla_jar_includes {
            glob::Pattern::new(pattern)?;
        }
        RelocationRewriter::new(&self.relocations)?;
        Ok(())
    }

    /// Check that every required input exists on disk.
    ///
    /// Optional auxiliary files are not checked; a missing one is simply left
    /// out of the bundle.
    pub fn check_inputs(&self) -> Result<()> {
        let dirs = [
            ("source-dir", &self.source_dir),
            ("build-data-dir", &self.build_data_dir),
        ];
        for (key, dir) in dirs {
            let resolved = self.resolve(dir);
            if !resolved.is_dir() {
                return Err(missing_input(key, &resolved));
            }
        }

        let files = [
            ("baseline", &self.baseline),
            ("reobf-mappings-file", &self.reobf_mappings_file),
            ("mojang-mapped-paperclip-file", &self.mojang_mapped_paperclip_file),
        ];
        for (key, file) in files {
            let resolved = self.resolve(file);
            if !resolved.exists() {
                return Err(missing_input(key, &resolved));
            }
        }
        Ok(())
    }
}

fn missing_input(key: &str, path: &Path) -> Error {
    Error::ConfigParse {
        message: format!("'{key}' points at '{}', which does not exist", path.display()),
        hint: Some(format!(
            "Paths are resolved relative to the configuration file; check '{key}'"
        )),
    }
}

/// Parse a YAML configuration string
///
/// Relative paths resolve against the current directory; use [`from_file`] to
/// resolve against the file's directory.
pub fn parse(yaml_content: &str) -> Result<BundleConfig> {
    let config: BundleConfig = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("Run 'dev-bundle validate' to check the configuration".to_string()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Parse a configuration file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BundleConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
    let mut config = parse(&content)?;
    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(config)
}
