//! DocBuilder - Main API for documentation generation
//!
//! This module provides the builder pattern API for configuring and
//! running documentation generation.

use crate::config::{JdocConfig, OutputFormat};
use crate::diagnostics::{Diagnostic, DiagnosticSeverity, JdocResult};
use crate::docgen::DocGenerator;
use crate::models::ProjectInfo;
use crate::resolver::ResolutionMode;
use std::path::{Path, PathBuf};

/// Build output describing the generated documentation
#[derive(Debug)]
pub struct BuildOutput {
    /// Written file
    pub output_path: PathBuf,
    /// Format of the written file
    pub format: OutputFormat,
    /// Number of documented commands
    pub command_count: usize,
    /// Number of distinct data structures across all commands
    pub structure_count: usize,
    /// Non-fatal findings of the run
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildOutput {
    /// Diagnostics of the given severity
    pub fn diagnostics_of(
        &self,
        severity: DiagnosticSeverity,
    ) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }
}

/// Builder for configuring documentation generation
///
/// # Example
///
/// ```no_run
/// use jdocgen::DocBuilder;
///
/// DocBuilder::new("./server")
///     .output("docs/API.md")
///     .include_rfc(false)
///     .build()
///     .expect("Failed to generate docs");
/// ```
#[derive(Debug, Clone)]
pub struct DocBuilder {
    config: JdocConfig,
}

impl DocBuilder {
    /// Create a builder for a project directory with default settings
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut config = JdocConfig::default();
        config.source.dir = dir.into();
        Self { config }
    }

    /// Create a builder from a loaded configuration
    pub fn from_config(config: JdocConfig) -> Self {
        Self { config }
    }

    /// Create a builder for a directory, reading its `jdocgen.toml` when present
    pub fn discover(dir: impl AsRef<Path>) -> JdocResult<Self> {
        JdocConfig::discover(dir.as_ref()).map(Self::from_config)
    }

    /// Set the project directory
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source.dir = dir.into();
        self
    }

    /// Set the output file
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.path = path.into();
        self
    }

    /// Set the output format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Include or omit the JSON-RPC 2.0 section
    pub fn include_rfc(mut self, include: bool) -> Self {
        self.config.output.include_rfc = include;
        self
    }

    /// Enable or disable the table of contents
    pub fn toc(mut self, enable: bool) -> Self {
        self.config.output.toc = enable;
        self
    }

    /// Scan `_test.go` files too
    pub fn include_tests(mut self, include: bool) -> Self {
        self.config.source.include_tests = include;
        self
    }

    /// Add a directory name that is never entered
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.config.source.exclude_dirs.push(name.into());
        self
    }

    /// Set the resolution mode
    pub fn resolution(mut self, mode: ResolutionMode) -> Self {
        self.config.resolution.mode = mode;
        self
    }

    /// Project information used when no comment carries global tags
    pub fn fallback_project(mut self, project: ProjectInfo) -> Self {
        self.config.project = Some(project);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &JdocConfig {
        &self.config
    }

    /// Generate and write the documentation
    pub fn build(self) -> JdocResult<BuildOutput> {
        DocGenerator::new(self.config).write()
    }
}
