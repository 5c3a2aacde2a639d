//! Configuration
//!
//! Settings come from an optional `jdocgen.toml`:
//!
//! ```toml
//! [source]
//! dir = "."
//! exclude_dirs = ["vendor"]
//! include_tests = false
//!
//! [output]
//! path = "API_Documentation.md"
//! format = "markdown"
//! include_rfc = true
//! toc = true
//!
//! [resolution]
//! mode = "strict"
//!
//! [project]
//! title = "Inventory API"
//! version = "1.0.0"
//! description = "Fallback used when no file carries global tags"
//! ```
//!
//! Every section and key is optional.

use crate::diagnostics::{JdocError, JdocResult};
use crate::models::ProjectInfo;
use crate::resolver::ResolutionMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name looked up in the source directory
pub const CONFIG_FILE_NAME: &str = "jdocgen.toml";

/// Default output file
pub const DEFAULT_OUTPUT: &str = "API_Documentation.md";

/// Output format for documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown document
    #[default]
    Markdown,
    /// JSON dump of the resolved documentation
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{}' (expected 'markdown' or 'json')",
                other
            )),
        }
    }
}

/// `[source]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Project root to scan
    pub dir: PathBuf,
    /// Directory names that are never entered (hidden directories always are skipped)
    pub exclude_dirs: Vec<String>,
    /// Whether `_test.go` files are scanned
    pub include_tests: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            exclude_dirs: vec!["vendor".to_string()],
            include_tests: false,
        }
    }
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Include the JSON-RPC 2.0 section
    pub include_rfc: bool,
    /// Table of contents when there are more than three commands
    pub toc: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::Markdown,
            include_rfc: true,
            toc: true,
        }
    }
}

/// `[resolution]` section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionConfig {
    pub mode: ResolutionMode,
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JdocConfig {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub resolution: ResolutionConfig,
    /// Project information used when no comment carries global tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectInfo>,
}

impl JdocConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> JdocResult<Self> {
        toml::from_str(content).map_err(|e| JdocError::config(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> JdocResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| JdocError::config(format!("failed to read {}: {}", path.display(), e)))?;
        let mut config = Self::from_toml(&content)
            .map_err(|e| JdocError::config(format!("{}: {}", path.display(), e)))?;

        // Relative source directories are relative to the config file.
        if config.source.dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.source.dir = parent.join(&config.source.dir);
            }
        }
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `jdocgen.toml` from `dir` when present, defaults otherwise.
    ///
    /// The source directory is always `dir`.
    pub fn discover(dir: &Path) -> JdocResult<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        let mut config = if candidate.is_file() {
            Self::load(&candidate)?
        } else {
            Self::default()
        };
        config.source.dir = dir.to_path_buf();
        Ok(config)
    }

    /// Fallback project information, if complete
    pub fn fallback_project(&self) -> JdocResult<Option<ProjectInfo>> {
        match &self.project {
            None => Ok(None),
            Some(info) if info.is_complete() => Ok(Some(info.clone())),
            Some(_) => Err(JdocError::config(
                "[project] needs title, version and description",
            )),
        }
    }
}
