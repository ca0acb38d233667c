//! Inspect command implementation
//!
//! Prints the manifest summary and entry list of an existing bundle, or the
//! raw `config.json` with `--json`.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use dev_bundle::bundle::{list_entries, read_entry, read_manifest};
use dev_bundle::defaults;
use dev_bundle::output::{count, label, status, OutputConfig, Status};
use dev_bundle::suggestions;
use dev_bundle::tree_diff::PATCH_SUFFIX;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Bundle archive to inspect
    #[arg(value_name = "BUNDLE", default_value = defaults::OUTPUT_FILE)]
    pub bundle: PathBuf,

    /// Print config.json as stored in the archive
    #[arg(long)]
    pub json: bool,

    /// List every archive entry
    #[arg(short, long)]
    pub entries: bool,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    if !args.bundle.is_file() {
        return Err(suggestions::bundle_not_found(&args.bundle));
    }

    if args.json {
        let bytes = read_entry(&args.bundle, defaults::MANIFEST_ENTRY)
            .map_err(suggestions::with_hint)?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "{} has no {}",
                    args.bundle.display(),
                    defaults::MANIFEST_ENTRY
                )
            })?;
        print!("{}", String::from_utf8_lossy(&bytes));
        return Ok(());
    }

    let manifest = read_manifest(&args.bundle).map_err(suggestions::with_hint)?;
    let entries = list_entries(&args.bundle).map_err(suggestions::with_hint)?;

    let patch_prefix = format!("{}/", manifest.patch_dir);
    let patches = entries
        .iter()
        .filter(|e| e.starts_with(&patch_prefix) && e.ends_with(PATCH_SUFFIX))
        .count();
    let new_files = entries
        .iter()
        .filter(|e| e.starts_with(&patch_prefix) && !e.ends_with(PATCH_SUFFIX))
        .count();

    println!(
        "{}",
        status(
            &out,
            Status::Package,
            &format!("Dev bundle {}", args.bundle.display())
        )
    );
    println!(
        "   {} {}",
        label(&out, "Minecraft version:"),
        manifest.minecraft_version
    );
    println!(
        "   {} {}",
        label(&out, "Mapped server:"),
        manifest.mapped_server_coordinates
    );
    println!(
        "   {} {} @ {}",
        label(&out, "Build data:"),
        manifest.spigot_data.checkout_url,
        manifest.spigot_data.git_ref
    );
    println!(
        "   {} {}, {}",
        label(&out, "Patches:"),
        count(patches, "patch", "patches"),
        count(new_files, "new file", "new files")
    );
    println!(
        "   {} {}",
        label(&out, "Libraries:"),
        manifest.build_data.library_dependencies.len()
    );
    println!(
        "   {} {}",
        label(&out, "Relocations:"),
        manifest.build_data.relocations.len()
    );

    let missing: Vec<&str> = manifest
        .referenced_paths()
        .into_iter()
        .filter(|path| *path != manifest.patch_dir)
        .filter(|path| !entries.iter().any(|e| e == path))
        .collect();
    for path in &missing {
        println!(
            "{}",
            status(
                &out,
                Status::Warn,
                &format!("Manifest references {path}, which is not in the archive")
            )
        );
    }

    if args.entries {
        println!("\n{}", status(&out, Status::Info, "Entries:"));
        for entry in &entries {
            println!("   {entry}");
        }
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Bundle is inconsistent: {} referenced file(s) missing",
            missing.len()
        );
    }
    Ok(())
}
