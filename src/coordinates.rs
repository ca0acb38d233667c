//! # Maven Coordinates
//!
//! Dependencies are declared in the configuration either as notation strings
//! (`group:name:version[:classifier]`) or as tables that spell out version
//! constraints separately. This module turns them into coordinate strings and
//! computes the library set declared by the bundle.
//!
//! ## Version selection
//!
//! A dependency may carry several version sources. They are consulted in
//! [`VersionSource::PRIORITY`] order and the first non-blank value wins:
//! strict constraint, required constraint, preferred constraint, then the
//! plain declared version.
//!
//! ## Library set
//!
//! The declared libraries are the union of the configured vanilla server
//! libraries and the coordinates of every external runtime dependency.
//! In-repo project dependencies are skipped. Any library owned by a
//! relocation is removed, since its classes ship inside the bundle's own
//! sources.

use crate::error::{Error, Result};
use crate::relocation::Relocation;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Where a dependency's version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    Strict,
    Required,
    Preferred,
    Declared,
}

impl VersionSource {
    /// Order in which sources are consulted.
    pub const PRIORITY: [VersionSource; 4] = [
        VersionSource::Strict,
        VersionSource::Required,
        VersionSource::Preferred,
        VersionSource::Declared,
    ];
}

/// A dependency declaration with everything needed to build its coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Dependency {
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// The plain declared version.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub strict_version: Option<String>,
    #[serde(default)]
    pub required_version: Option<String>,
    #[serde(default)]
    pub preferred_version: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    /// Marks a dependency on another module of the same build.
    #[serde(default)]
    pub project: bool,
}

impl Dependency {
    /// Parse `group:name:version[:classifier]`.
    ///
    /// Missing trailing parts are left empty so that [`Dependency::coordinates`]
    /// reports exactly which field is absent.
    pub fn from_notation(notation: &str) -> Self {
        let mut parts = notation.trim().splitn(4, ':').map(|s| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        });
        Self {
            group: parts.next().flatten(),
            name: parts.next().flatten(),
            version: parts.next().flatten(),
            classifier: parts.next().flatten(),
            ..Self::default()
        }
    }

    /// The value of one version source, if set.
    pub fn version_from(&self, source: VersionSource) -> Option<&str> {
        let value = match source {
            VersionSource::Strict => &self.strict_version,
            VersionSource::Required => &self.required_version,
            VersionSource::Preferred => &self.preferred_version,
            VersionSource::Declared => &self.version,
        };
        value.as_deref()
    }

    /// The selected version: first non-blank source in priority order.
    pub fn selected_version(&self) -> Option<&str> {
        select_version(
            VersionSource::PRIORITY
                .iter()
                .map(|source| self.version_from(*source)),
        )
    }

    /// Build `group:name:version[:classifier]`.
    ///
    /// Fails if group, name or version is absent or blank.
    pub fn coordinates(&self) -> Result<String> {
        let group = non_blank(self.group.as_deref()).ok_or_else(|| self.missing("group"))?;
        let name = non_blank(self.name.as_deref()).ok_or_else(|| self.missing("name"))?;
        let version = self.selected_version().ok_or_else(|| self.missing("version"))?;

        let mut coordinates = format!("{group}:{name}:{version}");
        if let Some(classifier) = non_blank(self.classifier.as_deref()) {
            coordinates.push(':');
            coordinates.push_str(classifier);
        }
        Ok(coordinates)
    }

    fn missing(&self, field: &str) -> Error {
        Error::MissingCoordinate {
            dependency: self.to_string(),
            field: field.to_string(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |p: &Option<String>| p.clone().unwrap_or_else(|| "?".to_string());
        write!(
            f,
            "{}:{}:{}",
            part(&self.group),
            part(&self.name),
            self.selected_version().unwrap_or("?")
        )
    }
}

/// A dependency as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Notation(String),
    Detailed(Dependency),
}

impl DependencySpec {
    /// Normalize into a [`Dependency`].
    pub fn to_dependency(&self) -> Dependency {
        match self {
            DependencySpec::Notation(notation) => Dependency::from_notation(notation),
            DependencySpec::Detailed(dependency) => dependency.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pick the first non-blank version among `candidates`.
pub fn select_version<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates.into_iter().find_map(non_blank)
}

/// Resolve each dependency to its coordinate string, in order.
///
/// Fails on the first dependency missing a required field.
pub fn resolve_coordinates(dependencies: &[DependencySpec]) -> Result<Vec<String>> {
    dependencies
        .iter()
        .map(|spec| spec.to_dependency().coordinates())
        .collect()
}

/// Whether `library` is owned by `owner`.
///
/// `owner` matches when it equals the coordinate or is a prefix ending on a
/// `:` boundary (`org.lib:lib` owns `org.lib:lib:1.0`, but not
/// `org.lib:lib-extra:1.0`).
pub fn is_owned_by(library: &str, owner: &str) -> bool {
    let owner = owner.trim().trim_end_matches(':');
    if owner.is_empty() {
        return false;
    }
    library == owner
        || (library.starts_with(owner) && library.as_bytes().get(owner.len()) == Some(&b':'))
}

/// Compute the external library set declared by the bundle.
///
/// See the module docs for the rules. The result is sorted.
pub fn resolve_libraries(
    vanilla_server_libraries: &[String],
    runtime_dependencies: &[DependencySpec],
    relocations: &[Relocation],
) -> Result<BTreeSet<String>> {
    let mut libraries: BTreeSet<String> = vanilla_server_libraries
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    for spec in runtime_dependencies {
        let dependency = spec.to_dependency();
        if dependency.project {
            debug!("Skipping project dependency {}", dependency);
            continue;
        }
        libraries.insert(dependency.coordinates()?);
    }

    let owners: Vec<&str> = relocations
        .iter()
        .filter_map(|r| r.owning_library_coordinates.as_deref())
        .collect();
    libraries.retain(|library| {
        let owned = owners.iter().any(|owner| is_owned_by(library, owner));
        if owned {
            debug!("Dropping relocated library {}", library);
        }
        !owned
    });

    Ok(libraries)
}
