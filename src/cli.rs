//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Dev Bundle - Package a modified server source tree as a reproducible dev bundle
#[derive(Parser, Debug)]
#[command(name = "dev-bundle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a dev bundle archive from dev-bundle.yaml
    Generate(commands::generate::GenerateArgs),

    /// Validate a dev-bundle.yaml configuration without writing anything
    Validate(commands::validate::ValidateArgs),

    /// Show the manifest and entries of an existing bundle
    Inspect(commands::inspect::InspectArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Inspect(args) => commands::inspect::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Initialize `env_logger`. `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let filter = match level.to_lowercase().as_str() {
        "error" | "warn" | "info" | "debug" | "trace" | "off" => level.to_lowercase(),
        _ => "info".to_string(),
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
