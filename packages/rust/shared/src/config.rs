//! Application configuration for mdindex.
//!
//! User config lives at `~/.mdindex/mdindex.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MdIndexError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "mdindex.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".mdindex";

// ---------------------------------------------------------------------------
// Config structs (matching mdindex.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Title extraction and filtering.
    #[serde(default)]
    pub indexer: IndexerConfig,

    /// Index verification.
    #[serde(default)]
    pub verifier: VerifierConfig,

    /// Index file output.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which acceptance rules the title resolver applies to inline headings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingPolicy {
    /// Accept every heading with non-empty text.
    #[default]
    Standard,
    /// Reject headings that look like code comments unless anchored.
    Strict,
}

/// How section addresses are spelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddrStyle {
    /// Full ancestor path, e.g. `1.2.1`.
    #[default]
    Path,
    /// Level and position only, e.g. `3.1`.
    LevelCounter,
}

/// Index file layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexLayout {
    /// One record per line inside the array.
    #[default]
    Records,
    /// `serde_json` pretty printing.
    Pretty,
}

/// `[indexer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Acceptance policy for headings that carry inline text.
    #[serde(default)]
    pub policy: HeadingPolicy,

    /// Address spelling, held for both numbering passes.
    #[serde(default)]
    pub addr_style: AddrStyle,

    /// Minimum effective content lines for a section to survive.
    #[serde(default = "default_min_content_lines")]
    pub min_content_lines: usize,

    /// Minimum cleaned title length under the strict policy.
    #[serde(default = "default_min_title_chars")]
    pub min_title_chars: usize,

    /// Glyph marking a confirmed title (strict policy).
    #[serde(default = "default_anchor")]
    pub anchor: char,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            policy: HeadingPolicy::default(),
            addr_style: AddrStyle::default(),
            min_content_lines: default_min_content_lines(),
            min_title_chars: default_min_title_chars(),
            anchor: default_anchor(),
        }
    }
}

fn default_min_content_lines() -> usize {
    2
}
fn default_min_title_chars() -> usize {
    3
}
fn default_anchor() -> char {
    '¶'
}

/// `[verifier]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Lines after the recorded line searched for the title.
    #[serde(default = "default_search_window")]
    pub search_window: usize,

    /// Minimum effective content lines before a coherence issue.
    #[serde(default = "default_min_content_lines")]
    pub min_content_lines: usize,

    /// Document lines shown on each side of a reported line.
    #[serde(default)]
    pub context_lines: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            search_window: default_search_window(),
            min_content_lines: default_min_content_lines(),
            context_lines: 0,
        }
    }
}

fn default_search_window() -> usize {
    10
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Index file layout.
    #[serde(default)]
    pub layout: IndexLayout,

    /// Where `index` writes when no `--output` is given.
    #[serde(default = "default_index_path")]
    pub default_index_path: String,

    /// Log file used when no `--log` is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_log_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            layout: IndexLayout::default(),
            default_index_path: default_index_path(),
            default_log_path: None,
        }
    }
}

fn default_index_path() -> String {
    "output/index.json".into()
}

impl AppConfig {
    /// Reject values the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.indexer.min_content_lines == 0 {
            return Err(MdIndexError::config(
                "indexer.min_content_lines must be at least 1",
            ));
        }
        if self.verifier.min_content_lines == 0 {
            return Err(MdIndexError::config(
                "verifier.min_content_lines must be at least 1",
            ));
        }
        if self.indexer.anchor.is_whitespace() || self.indexer.anchor == '#' {
            return Err(MdIndexError::config(format!(
                "indexer.anchor {:?} cannot be whitespace or '#'",
                self.indexer.anchor
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.mdindex/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| MdIndexError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.mdindex/mdindex.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MdIndexError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| MdIndexError::config(format!("failed to parse {}: {e}", path.display())))?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| MdIndexError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MdIndexError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MdIndexError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
