//! Default values and fixed names for dev-bundle.
//!
//! This module provides centralized constants used by the packager, the
//! manifest builder and the CLI, ensuring the archive layout and the manifest
//! always agree.

/// Default configuration file name.
pub const CONFIG_FILE: &str = "dev-bundle.yaml";

/// Default output archive path, relative to the configuration file.
pub const OUTPUT_FILE: &str = "dev-bundle.tar.gz";

/// Name of the manifest entry at the archive root.
pub const MANIFEST_ENTRY: &str = "config.json";

/// Archive directory holding auxiliary data files.
pub const DATA_DIR: &str = "data";

/// Archive directory holding generated patches and new files.
pub const PATCH_DIR: &str = "patches";

/// Fixed archive names for data files, independent of input names.
pub mod data_files {
    pub const ADDITIONAL_SPIGOT_CLASS_MAPPINGS: &str = "additional-spigot-class-mappings.csrg";
    pub const ADDITIONAL_SPIGOT_MEMBER_MAPPINGS: &str = "additional-spigot-member-mappings.csrg";
    pub const MAPPINGS_PATCH: &str = "mappings-patch.tiny";
    pub const REOBF_MAPPINGS: &str = "mojang+yarn-spigot-reobf.tiny";
    pub const MOJANG_MAPPED_PAPERCLIP: &str = "paperclip-mojang+yarn.jar";
}

/// Arguments passed to the decompiler unless the configuration overrides them.
pub fn decompiler_args() -> Vec<String> {
    [
        "-dgs=1", "-hdc=0", "-asc=1", "-udv=0", "-rsy=1", "-aoa=1", "-jvn=0", "-isl=0",
        "-iib=1", "-bsm=1", "-dcl=1", "-ovr=0", "-pll=999999999", "-ind=    ",
        "-cfg", "{libraries}", "{input}", "{output}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Arguments passed to the remapper unless the configuration overrides them.
pub fn remapper_args() -> Vec<String> {
    [
        "{input}", "{output}", "{mappingsFile}", "{from}", "{to}", "{classpath}",
        "--fixpackageaccess", "--renameinvalidlocals", "--threads=1", "--rebuildsourcefilenames",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Remapper arguments recorded for remapping plugins against the server.
pub fn plugin_remap_args() -> Vec<String> {
    [
        "{input}", "{output}", "{mappingsFile}", "{from}", "{to}", "{classpath}",
        "--threads=1",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_file_names_are_distinct() {
        let names = [
            data_files::ADDITIONAL_SPIGOT_CLASS_MAPPINGS,
            data_files::ADDITIONAL_SPIGOT_MEMBER_MAPPINGS,
            data_files::MAPPINGS_PATCH,
            data_files::REOBF_MAPPINGS,
            data_files::MOJANG_MAPPED_PAPERCLIP,
        ];
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_runner_args_have_placeholders() {
        assert!(decompiler_args().contains(&"{input}".to_string()));
        assert!(decompiler_args().contains(&"{output}".to_string()));
        assert_eq!(remapper_args()[0], "{input}");
        assert!(plugin_remap_args().len() < remapper_args().len());
    }
}
