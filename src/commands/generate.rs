//! Generate command implementation
//!
//! Runs the whole bundle pipeline for one configuration file:
//! 1. Resolve coordinates and read build-data provenance
//! 2. Stage the source tree and reverse relocations
//! 3. Diff against the baseline
//! 4. Write the archive

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use dev_bundle::bundle::BundlePackager;
use dev_bundle::output::{count, label, status, OutputConfig, Status};
use dev_bundle::suggestions;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "DEV_BUNDLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output archive (overrides 'output' in the config file)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();

    let config_path = super::config_path(args.config);
    let mut config = super::load_config(&config_path)?;
    if let Some(output) = args.output {
        config.output = std::env::current_dir()?.join(output);
    }

    if !args.quiet {
        println!(
            "{}",
            status(
                &out,
                Status::Scan,
                &format!("Generating dev bundle from {}", config_path.display())
            )
        );
    }

    let report = match BundlePackager::new(&config).run() {
        Ok(report) => report,
        Err(e) => {
            if !args.quiet {
                println!("{}", status(&out, Status::Err, "Bundle generation failed"));
            }
            return Err(suggestions::with_hint(e));
        }
    };

    if !args.quiet {
        println!(
            "{}",
            status(
                &out,
                Status::Package,
                &format!(
                    "Bundle written in {:.2}s: {}",
                    start_time.elapsed().as_secs_f64(),
                    report.output.display()
                )
            )
        );
        println!(
            "   {} {}",
            label(&out, "Staged:"),
            count(report.staged, "file", "files")
        );
        if report.relocation.files_rewritten > 0 || report.relocation.files_moved > 0 {
            println!(
                "   {} {} rewritten, {} moved",
                label(&out, "Relocations:"),
                count(report.relocation.files_rewritten, "file", "files"),
                report.relocation.files_moved
            );
        }
        println!(
            "   {} {} new, {} patched, {} unchanged",
            label(&out, "Files:"),
            report.new_files,
            report.patched_files,
            report.unchanged_files
        );
        println!(
            "   {} {}",
            label(&out, "Data:"),
            report.data_files.join(", ")
        );
        println!(
            "   {} {} entries",
            label(&out, "Archive:"),
            report.entries
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_execute_missing_config() {
        let args = GenerateArgs {
            config: Some(PathBuf::from("/nonexistent/dev-bundle.yaml")),
            output: None,
            quiet: true,
        };

        let result = execute(args, "never");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Configuration file not found"));
    }

    #[test]
    fn test_execute_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dev-bundle.yaml");
        fs::write(&config_path, "minecraft-version: '1.17.1'\n").unwrap();

        let args = GenerateArgs {
            config: Some(config_path),
            output: None,
            quiet: true,
        };

        let message = execute(args, "never").unwrap_err().to_string();
        assert!(message.contains("Configuration parsing error"));
    }

    #[test]
    fn test_execute_missing_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dev-bundle.yaml");
        fs::write(
            &config_path,
            r#"
minecraft-version: "1.17.1"
mapped-server-coordinates: g:server:1
api-coordinates: g:api:1
mojang-api-coordinates: g:mojangapi:1
server-url: https://example.com/server.jar
source-dir: src
baseline: decompiled
build-data-dir: build-data
spigot-data:
  class-mappings-file: cl.csrg
  member-mappings-file: members.csrg
  at-file: bukkit.at
reobf-mappings-file: reobf.tiny
mojang-mapped-paperclip-file: paperclip.jar
param-mappings: { url: "https://maven.example.com/" }
decompiler: { url: "https://maven.example.com/" }
remapper: { url: "https://maven.example.com/" }
"#,
        )
        .unwrap();

        let args = GenerateArgs {
            config: Some(config_path),
            output: None,
            quiet: true,
        };

        let message = execute(args, "never").unwrap_err().to_string();
        assert!(message.contains("'source-dir'"));
        assert!(!temp_dir.path().join("dev-bundle.tar.gz").exists());
    }
}
