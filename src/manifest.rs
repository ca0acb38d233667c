//! # Bundle Manifest
//!
//! The manifest (`config.json` at the archive root) is the single source of
//! truth a consumer needs to replay the pipeline: which tools to fetch, which
//! mappings to apply, which libraries to declare, and where the patches live.
//!
//! Every path in the manifest is relative to the archive root and names an
//! entry that is physically present in the archive. Everything else is
//! referenced by URL or Maven coordinate. Optional data files whose input is
//! absent are omitted from both the archive and the manifest.

use crate::config::BundleConfig;
use crate::coordinates::{resolve_coordinates, resolve_libraries};
use crate::defaults::{self, data_files};
use crate::error::Result;
use crate::git::{self, VcsProvenance};
use crate::relocation::Relocation;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A Maven repository plus coordinates fetched from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenDep {
    pub url: String,
    pub coordinates: Vec<String>,
}

/// An external tool and the arguments to run it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runner {
    pub dep: MavenDep,
    pub args: Vec<String>,
}

/// Provenance of the spigot mapping data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpigotData {
    /// Commit of the build-data checkout.
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub checkout_url: String,
    pub class_mappings_file: String,
    pub member_mappings_file: String,
    pub at_file: String,
}

/// Inputs to the consumer-side build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildData {
    pub api_coordinates: String,
    pub mojang_api_coordinates: String,
    pub param_mappings: MavenDep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_spigot_class_mappings_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_spigot_member_mappings_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings_patch_file: Option<String>,
    pub reobf_mappings_file: String,
    pub mojang_mapped_paperclip_file: String,
    pub library_dependencies: BTreeSet<String>,
    pub library_repositories: Vec<String>,
    pub relocations: Vec<Relocation>,
    pub minecraft_remap_args: Vec<String>,
    pub plugin_remap_args: Vec<String>,
    pub server_url: String,
    pub vanilla_jar_includes: Vec<String>,
}

/// The complete manifest written as `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleManifest {
    pub minecraft_version: String,
    pub mapped_server_coordinates: String,
    pub spigot_data: SpigotData,
    pub build_data: BuildData,
    pub decompile: Runner,
    pub remapper: Runner,
    /// Archive directory holding the patches.
    pub patch_dir: String,
}

impl BundleManifest {
    /// Serialize as pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Deserialize from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Every archive path this manifest references.
    pub fn referenced_paths(&self) -> Vec<&str> {
        let b = &self.build_data;
        [
            b.additional_spigot_class_mappings_file.as_deref(),
            b.additional_spigot_member_mappings_file.as_deref(),
            b.mappings_patch_file.as_deref(),
            Some(b.reobf_mappings_file.as_str()),
            Some(b.mojang_mapped_paperclip_file.as_str()),
            Some(self.patch_dir.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// A data file copied into the archive under a fixed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    /// Input file on disk.
    pub source: PathBuf,
    /// Fixed file name inside the data directory.
    pub name: &'static str,
}

impl DataFile {
    /// Path of this file relative to the archive root.
    pub fn archive_path(&self) -> String {
        format!("{}/{}", defaults::DATA_DIR, self.name)
    }
}

/// The data files that go into the archive for one run.
///
/// Both the manifest and the archive writer are driven from this value, so
/// they cannot disagree about which files are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub additional_spigot_class_mappings: Option<DataFile>,
    pub additional_spigot_member_mappings: Option<DataFile>,
    pub mappings_patch: Option<DataFile>,
    pub reobf_mappings: DataFile,
    pub mojang_mapped_paperclip: DataFile,
}

impl DataFiles {
    /// Collect data files from `config`, dropping optional inputs that do not
    /// exist.
    pub fn collect(config: &BundleConfig) -> Self {
        let optional = |path: &Option<PathBuf>, name: &'static str| {
            let source = config.resolve(path.as_ref()?);
            if source.is_file() {
                Some(DataFile { source, name })
            } else {
                info!("Optional input {} not found; omitting {}", source.display(), name);
                None
            }
        };
        let required = |path: &Path, name: &'static str| DataFile {
            source: config.resolve(path),
            name,
        };

        Self {
            additional_spigot_class_mappings: optional(
                &config.additional_spigot_class_mappings_file,
                data_files::ADDITIONAL_SPIGOT_CLASS_MAPPINGS,
            ),
            additional_spigot_member_mappings: optional(
                &config.additional_spigot_member_mappings_file,
                data_files::ADDITIONAL_SPIGOT_MEMBER_MAPPINGS,
            ),
            mappings_patch: optional(&config.mappings_patch_file, data_files::MAPPINGS_PATCH),
            reobf_mappings: required(&config.reobf_mappings_file, data_files::REOBF_MAPPINGS),
            mojang_mapped_paperclip: required(
                &config.mojang_mapped_paperclip_file,
                data_files::MOJANG_MAPPED_PAPERCLIP,
            ),
        }
    }

    /// Present data files in archive order.
    pub fn entries(&self) -> Vec<&DataFile> {
        [
            self.additional_spigot_class_mappings.as_ref(),
            self.additional_spigot_member_mappings.as_ref(),
            self.mappings_patch.as_ref(),
            Some(&self.reobf_mappings),
            Some(&self.mojang_mapped_paperclip),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Assembles a [`BundleManifest`] from configuration.
pub struct ManifestBuilder<'a> {
    config: &'a BundleConfig,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(config: &'a BundleConfig) -> Self {
        Self { config }
    }

    /// Build the manifest, reading provenance from the build-data checkout.
    pub fn build(&self, data_files: &DataFiles) -> Result<BundleManifest> {
        let build_data_dir = self.config.resolve(&self.config.build_data_dir);
        let provenance = git::read_provenance(&build_data_dir)?;
        debug!(
            "Build data at {} is {} ({})",
            build_data_dir.display(),
            provenance.commit,
            provenance.remote_url
        );
        self.build_with_provenance(provenance, data_files)
    }

    /// Build the manifest from already-known provenance.
    pub fn build_with_provenance(
        &self,
        provenance: VcsProvenance,
        data_files: &DataFiles,
    ) -> Result<BundleManifest> {
        let config = self.config;

        let library_dependencies = resolve_libraries(
            &config.vanilla_server_libraries,
            &config.runtime_dependencies,
            &config.relocations,
        )?;

        let build_data = BuildData {
            api_coordinates: config.api_coordinates.clone(),
            mojang_api_coordinates: config.mojang_api_coordinates.clone(),
            param_mappings: MavenDep {
                url: config.param_mappings.url.clone(),
                coordinates: resolve_coordinates(&config.param_mappings.dependencies)?,
            },
            additional_spigot_class_mappings_file: data_files
                .additional_spigot_class_mappings
                .as_ref()
                .map(DataFile::archive_path),
            additional_spigot_member_mappings_file: data_files
                .additional_spigot_member_mappings
                .as_ref()
                .map(DataFile::archive_path),
            mappings_patch_file: data_files.mappings_patch.as_ref().map(DataFile::archive_path),
            reobf_mappings_file: data_files.reobf_mappings.archive_path(),
            mojang_mapped_paperclip_file: data_files.mojang_mapped_paperclip.archive_path(),
            library_dependencies,
            library_repositories: config.library_repositories.clone(),
            relocations: config.relocations.clone(),
            minecraft_remap_args: config.remapper_args(),
            plugin_remap_args: config.plugin_remap_args(),
            server_url: config.server_url.clone(),
            vanilla_jar_includes: config.vanilla_jar_includes.clone(),
        };

        Ok(BundleManifest {
            minecraft_version: config.minecraft_version.clone(),
            mapped_server_coordinates: config.mapped_server_coordinates.clone(),
            spigot_data: SpigotData {
                git_ref: provenance.commit,
                checkout_url: provenance.remote_url,
                class_mappings_file: config.spigot_data.class_mappings_file.clone(),
                member_mappings_file: config.spigot_data.member_mappings_file.clone(),
                at_file: config.spigot_data.at_file.clone(),
            },
            build_data,
            decompile: Runner {
                dep: MavenDep {
                    url: config.decompiler.url.clone(),
                    coordinates: resolve_coordinates(&config.decompiler.dependencies)?,
                },
                args: config.decompiler_args(),
            },
            remapper: Runner {
                dep: MavenDep {
                    url: config.remapper.url.clone(),
                    coordinates: resolve_coordinates(&config.remapper.dependencies)?,
                },
                args: config.remapper_args(),
            },
            patch_dir: defaults::PATCH_DIR.to_string(),
        })
    }
}
