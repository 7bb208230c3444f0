//! Configuration module for the documentation extractor.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `SD_` and use double underscores
//! to separate nested levels:
//! - `SD_TAB_WIDTH=8` sets `tab_width`
//! - `SD_PARSING__STRICT_SYNTAX=true` sets `parsing.strict_syntax`
//! - `SD_OUTPUT__PRETTY=false` sets `output.pretty`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".scopedoc";
const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Column width of a tab when measuring comment margins
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// File extensions accepted by `scopedoc parse`
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub parsing: ParsingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ParsingConfig {
    /// Fail on syntax errors instead of extracting from the recovered tree
    #[serde(default = "default_false")]
    pub strict_syntax: bool,

    /// List unattached documentation in the root node's errors
    #[serde(default = "default_true")]
    pub report_orphans: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Keep per-document `errors` in the output
    #[serde(default = "default_true")]
    pub include_errors: bool,
}

fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_tab_width() -> usize {
    crate::parsing::DEFAULT_TAB_WIDTH
}
fn default_extensions() -> Vec<String> {
    ["js", "mjs", "cjs", "jsx"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            tab_width: default_tab_width(),
            extensions: default_extensions(),
            parsing: ParsingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            strict_syntax: false,
            report_orphans: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            include_errors: true,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .scopedoc directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Self::layered(config_path).extract().map_err(Box::new)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::layered(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn layered(config_path: PathBuf) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Layer in environment variables with SD_ prefix
            // Use double underscore (__) to separate nested levels
            // Single underscore (_) remains as is within field names
            .merge(Env::prefixed("SD_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".") // Double underscore becomes dot
                    .into()
            }))
    }

    /// Find the workspace config by looking for .scopedoc directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where .scopedoc is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(ancestor.to_path_buf());
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Self::init_config_file_in(Path::new("."), force)
    }

    /// Create a default settings file with helpful comments under `root`
    pub fn init_config_file_in(
        root: &Path,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = format!(
            r#"# scopedoc configuration file

# Version of the configuration schema
version = 1

# Global debug mode (same as --debug)
debug = false

# Column width of a tab when measuring comment margins
tab_width = {}

# File extensions accepted by `scopedoc parse`
extensions = ["js", "mjs", "cjs", "jsx"]

[parsing]
# Refuse files with syntax errors instead of documenting the recovered tree
strict_syntax = false

# List documentation that could not be attached in the root node's errors
report_orphans = true

[output]
# Pretty-print JSON output
pretty = true

# Keep per-document diagnostics in the output
include_errors = true
"#,
            default_tab_width()
        );

        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}
