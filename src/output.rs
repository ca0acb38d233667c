//! # Output Configuration
//!
//! Controls how the CLI reports progress: emoji or plain-text status markers,
//! and colored or plain labels.
//!
//! The following environment variables and flags are respected:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust
//! use dev_bundle::output::{status, OutputConfig, Status};
//!
//! let out = OutputConfig::from_env_and_flag("never");
//! assert_eq!(status(&out, Status::Ok, "Bundle written"), "[OK] Bundle written");
//! ```

use console::Style;
use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`. `always` overrides `NO_COLOR`;
    /// `auto` and unknown values fall back to detection.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Kinds of status line printed by the commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Scan,
    Ok,
    Warn,
    Err,
    Info,
    Package,
}

impl Status {
    fn markers(self) -> (&'static str, &'static str) {
        match self {
            Status::Scan => ("🔍", "[SCAN]"),
            Status::Ok => ("✅", "[OK]"),
            Status::Warn => ("⚠️", "[WARN]"),
            Status::Err => ("❌", "[ERR]"),
            Status::Info => ("📊", "[INFO]"),
            Status::Package => ("📦", "[BUNDLE]"),
        }
    }
}

/// A status line: marker followed by `message`.
pub fn status(config: &OutputConfig, kind: Status, message: &str) -> String {
    let (emoji_str, plain) = kind.markers();
    format!("{} {}", emoji(config, emoji_str, plain), message)
}

/// Render `text` as a bold label when colors are enabled.
pub fn label(config: &OutputConfig, text: &str) -> String {
    Style::new()
        .bold()
        .force_styling(config.use_color)
        .apply_to(text)
        .to_string()
}

/// `"1 file"` / `"2 files"`.
pub fn count(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("NEVER");
        assert!(!config.use_color);
    }

    #[test]
    fn test_status_markers() {
        assert_eq!(
            status(&OutputConfig::without_color(), Status::Warn, "careful"),
            "[WARN] careful"
        );
        assert_eq!(
            status(&OutputConfig::with_color(), Status::Package, "done"),
            "📦 done"
        );
    }

    #[test]
    fn test_label_plain_without_color() {
        assert_eq!(label(&OutputConfig::without_color(), "Output"), "Output");
        assert_ne!(label(&OutputConfig::with_color(), "Output"), "Output");
    }

    #[test]
    fn test_count_pluralizes() {
        assert_eq!(count(0, "file", "files"), "0 files");
        assert_eq!(count(1, "file", "files"), "1 file");
        assert_eq!(count(3, "patch", "patches"), "3 patches");
    }
}
