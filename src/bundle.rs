//! # Bundle Packaging
//!
//! Top-level orchestration of a bundle run and the archive format.
//!
//! ## Process
//!
//! 1.  **Manifest**: Build the manifest first, so configuration errors abort
//!     before any output is touched.
//! 2.  **Clear**: Remove a previous archive at the output path.
//! 3.  **Stage**: Copy the working source tree into a scratch directory.
//! 4.  **Relocate**: Reverse relocations in the staged copy.
//! 5.  **Diff**: Compare the staged copy against the baseline, writing patches
//!     and new files into a second scratch directory.
//! 6.  **Write**: Write `config.json`, the data files and the patch tree into a
//!     temporary archive next to the output, then move it into place.
//!
//! Scratch directories are owned values and are removed when the run ends,
//! on success or failure. A half-written archive is never visible at the
//! output path.
//!
//! ## Archive layout
//!
//! ```text
//! config.json
//! data/<fixed-name>
//! patches/<relative/path>         new files
//! patches/<relative/path>.patch   unified diffs
//! ```
//!
//! The archive is a gzip-compressed tar with zeroed timestamps and fixed
//! ownership, written in a fixed order, so identical inputs produce identical
//! bytes.

use crate::baseline::BaselineTree;
use crate::config::BundleConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::filesystem::{self, scratch_dir, SourceTree};
use crate::git::VcsProvenance;
use crate::manifest::{BundleManifest, DataFiles, ManifestBuilder};
use crate::path::relative_slash_path;
use crate::relocation::{RelocationReport, RelocationRewriter};
use crate::tree_diff::{diff_trees, FileClassification};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use log::info;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tar::{Builder, Header};

/// Summary of a completed bundle run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleReport {
    /// Archive that was written.
    pub output: PathBuf,
    /// Files staged from the working tree.
    pub staged: usize,
    pub relocation: RelocationReport,
    pub new_files: usize,
    pub patched_files: usize,
    pub unchanged_files: usize,
    /// Archive paths of the data files included.
    pub data_files: Vec<String>,
    /// Total number of archive entries.
    pub entries: usize,
}

/// Runs the whole pipeline for one configuration.
pub struct BundlePackager<'a> {
    config: &'a BundleConfig,
    provenance: Option<VcsProvenance>,
}

impl<'a> BundlePackager<'a> {
    pub fn new(config: &'a BundleConfig) -> Self {
        Self {
            config,
            provenance: None,
        }
    }

    /// Use known provenance instead of querying the build-data checkout.
    pub fn with_provenance(mut self, provenance: VcsProvenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    /// Output archive path for this run.
    pub fn output_path(&self) -> PathBuf {
        self.config.resolve(&self.config.output)
    }

    /// Generate the bundle.
    pub fn run(&self) -> Result<BundleReport> {
        let config = self.config;
        config.check_inputs()?;
        let rewriter = RelocationRewriter::new(&config.relocations)?;

        let data_files = DataFiles::collect(config);
        let builder = ManifestBuilder::new(config);
        let manifest = match &self.provenance {
            Some(provenance) => builder.build_with_provenance(provenance.clone(), &data_files)?,
            None => builder.build(&data_files)?,
        };

        let output = self.output_path();
        if output.exists() {
            info!("Removing previous bundle {}", output.display());
            fs::remove_file(&output).map_err(|e| Error::fs(&output, e))?;
        }

        let baseline = BaselineTree::open(&config.resolve(&config.baseline))?;
        let source = SourceTree::stage(&config.resolve(&config.source_dir))?;
        let relocation = rewriter.rewrite_tree(source.root())?;

        let patches = scratch_dir("dev-bundle-patches-")?;
        let diff = diff_trees(source.root(), &baseline, patches.path())?;

        let entries = write_archive(&output, &manifest, &data_files, patches.path())?;
        info!("Wrote {} entries to {}", entries, output.display());

        Ok(BundleReport {
            output,
            staged: source.staged_files(),
            relocation,
            new_files: diff.count(FileClassification::New),
            patched_files: diff.count(FileClassification::Patched),
            unchanged_files: diff.count(FileClassification::Unchanged),
            data_files: data_files
                .entries()
                .iter()
                .map(|f| f.archive_path())
                .collect(),
            entries,
        })
    }
}

/// Write the archive to a temporary file beside `output`, then move it into
/// place. Returns the number of entries written.
fn write_archive(
    output: &Path,
    manifest: &BundleManifest,
    data_files: &DataFiles,
    patches: &Path,
) -> Result<usize> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| Error::fs(&parent, e))?;

    let temp = tempfile::Builder::new()
        .prefix(".dev-bundle-")
        .suffix(".tmp")
        .tempfile_in(&parent)
        .map_err(|e| Error::fs(&parent, e))?;

    let writer = BufWriter::new(temp.as_file());
    let mut tar = create_deterministic_tar(writer);
    let mut entries = 0;

    write_entry(&mut tar, defaults::MANIFEST_ENTRY, &manifest.to_json()?)
        .map_err(|e| Error::archive(output, e))?;
    entries += 1;

    for data_file in data_files.entries() {
        append_file(&mut tar, &data_file.archive_path(), &data_file.source)?;
        entries += 1;
    }

    for file in filesystem::list_files(patches)? {
        let relative = relative_slash_path(patches, &file)
            .ok_or_else(|| Error::fs(&file, "file is outside the patch directory"))?;
        append_file(&mut tar, &format!("{}/{relative}", defaults::PATCH_DIR), &file)?;
        entries += 1;
    }

    let encoder = tar.into_inner().map_err(|e| Error::archive(output, e))?;
    let mut writer = encoder.finish().map_err(|e| Error::archive(output, e))?;
    writer.flush().map_err(|e| Error::archive(output, e))?;
    drop(writer);

    temp.persist(output)
        .map_err(|e| Error::archive(output, e.error))?;
    Ok(entries)
}

fn create_deterministic_tar<W: Write>(writer: W) -> Builder<GzEncoder<W>> {
    let encoder = GzBuilder::new()
        .mtime(0)
        .operating_system(255)
        .write(writer, Compression::best());

    let mut tar = Builder::new(encoder);
    tar.mode(tar::HeaderMode::Deterministic);
    tar
}

fn entry_header(size: u64) -> std::io::Result<Header> {
    let mut header = Header::new_gnu();
    header.set_size(size);
    header.set_mode(0o644);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_username("dev-bundle")?;
    header.set_groupname("dev-bundle")?;
    Ok(header)
}

fn write_entry<T: Write>(tar: &mut Builder<T>, path: &str, data: &[u8]) -> std::io::Result<()> {
    let mut header = entry_header(data.len() as u64)?;
    tar.append_data(&mut header, path, data)
}

fn append_file<T: Write>(tar: &mut Builder<T>, path: &str, source: &Path) -> Result<()> {
    let file = File::open(source).map_err(|e| Error::fs(source, e))?;
    let size = file.metadata().map_err(|e| Error::fs(source, e))?.len();
    let mut header = entry_header(size).map_err(|e| Error::fs(source, e))?;
    tar.append_data(&mut header, path, BufReader::new(file))
        .map_err(|e| Error::archive(path, e))
}

fn open_archive(archive: &Path) -> Result<tar::Archive<GzDecoder<BufReader<File>>>> {
    let file = File::open(archive).map_err(|e| Error::fs(archive, e))?;
    Ok(tar::Archive::new(GzDecoder::new(BufReader::new(file))))
}

/// List entry paths of a bundle archive, in archive order.
pub fn list_entries(archive: &Path) -> Result<Vec<String>> {
    let mut tar = open_archive(archive)?;
    let mut paths = Vec::new();
    for entry in tar.entries().map_err(|e| Error::archive(archive, e))? {
        let entry = entry.map_err(|e| Error::archive(archive, e))?;
        let path = entry.path().map_err(|e| Error::archive(archive, e))?;
        paths.push(path.to_string_lossy().replace('\\', "/"));
    }
    Ok(paths)
}

/// Read one entry's bytes from a bundle archive, if present.
pub fn read_entry(archive: &Path, name: &str) -> Result<Option<Vec<u8>>> {
    let mut tar = open_archive(archive)?;
    for entry in tar.entries().map_err(|e| Error::archive(archive, e))? {
        let mut entry = entry.map_err(|e| Error::archive(archive, e))?;
        let path = entry.path().map_err(|e| Error::archive(archive, e))?;
        if path.to_string_lossy().replace('\\', "/") == name {
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| Error::archive(archive, e))?;
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}

/// Read the manifest of a bundle archive.
pub fn read_manifest(archive: &Path) -> Result<BundleManifest> {
    let bytes = read_entry(archive, defaults::MANIFEST_ENTRY)?.ok_or_else(|| {
        Error::archive(
            archive,
            format!("archive has no {}", defaults::MANIFEST_ENTRY),
        )
    })?;
    BundleManifest::from_json(&bytes)
}
