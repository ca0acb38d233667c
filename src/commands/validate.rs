//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a
//! `dev-bundle.yaml` file without generating anything.
//!
//! ## Functionality
//!
//! - **Configuration Validation**: Parses the file and checks required values,
//!   glob patterns and relocation rules.
//! - **Coordinate Resolution**: Resolves every dependency to a Maven
//!   coordinate and computes the declared library set.
//! - **Input Validation**: With `--check-inputs`, verifies that every input
//!   path exists and reports optional files that will be omitted.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use dev_bundle::coordinates::{resolve_coordinates, resolve_libraries};
use dev_bundle::output::{status, OutputConfig, Status};
use dev_bundle::suggestions;

/// Validate a dev-bundle.yaml configuration file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the dev-bundle.yaml configuration file to validate.
    #[arg(short, long, value_name = "FILE", env = "DEV_BUNDLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also check that every input path exists.
    #[arg(long)]
    pub check_inputs: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config_path = super::config_path(args.config);
    println!(
        "{}",
        status(
            &out,
            Status::Scan,
            &format!("Validating configuration: {}", config_path.display())
        )
    );

    let config = match super::load_config(&config_path) {
        Ok(config) => {
            println!(
                "{}",
                status(&out, Status::Ok, "Configuration file parsed successfully")
            );
            config
        }
        Err(e) => {
            println!(
                "{}",
                status(&out, Status::Err, "Configuration parsing failed")
            );
            return Err(e);
        }
    };

    println!("\n{}", status(&out, Status::Info, "Configuration Summary:"));
    println!("   Minecraft version: {}", config.minecraft_version);
    println!("   Mapped server: {}", config.mapped_server_coordinates);
    println!("   Relocations: {}", config.relocations.len());

    println!(
        "\n{}",
        status(&out, Status::Scan, "Resolving dependency coordinates...")
    );
    let runners = [
        ("param-mappings", &config.param_mappings.dependencies),
        ("decompiler", &config.decompiler.dependencies),
        ("remapper", &config.remapper.dependencies),
    ];
    for (name, dependencies) in runners {
        let coordinates = resolve_coordinates(dependencies).map_err(suggestions::with_hint)?;
        println!("   {}: {}", name, coordinates.join(", "));
    }
    let libraries = resolve_libraries(
        &config.vanilla_server_libraries,
        &config.runtime_dependencies,
        &config.relocations,
    )
    .map_err(suggestions::with_hint)?;
    println!("   Library dependencies: {}", libraries.len());

    if args.check_inputs {
        println!("\n{}", status(&out, Status::Scan, "Checking input paths..."));
        config.check_inputs().map_err(suggestions::with_hint)?;

        let optional = [
            (
                "additional-spigot-class-mappings-file",
                &config.additional_spigot_class_mappings_file,
            ),
            (
                "additional-spigot-member-mappings-file",
                &config.additional_spigot_member_mappings_file,
            ),
            ("mappings-patch-file", &config.mappings_patch_file),
        ];
        for (key, path) in optional {
            if let Some(path) = path {
                let resolved = config.resolve(path);
                if !resolved.is_file() {
                    println!(
                        "{}",
                        status(
                            &out,
                            Status::Warn,
                            &format!(
                                "'{key}' ({}) not found; it will be left out of the bundle",
                                resolved.display()
                            )
                        )
                    );
                }
            }
        }
        println!("{}", status(&out, Status::Ok, "All required inputs exist"));
    }

    println!("\n{}", status(&out, Status::Ok, "Configuration is valid"));
    Ok(())
}
