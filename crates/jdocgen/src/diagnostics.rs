//! Error types and diagnostics
//!
//! Two channels are used while generating documentation:
//! - [`JdocError`] for failures that abort the run (I/O, Go syntax errors,
//!   bad configuration, missing project information)
//! - [`DiagnosticsCollector`] for findings that are reported but never stop
//!   the run (unresolved types, malformed generics, bad annotations)

use std::path::PathBuf;
use thiserror::Error;

/// Result type for jdocgen operations
pub type JdocResult<T> = Result<T, JdocError>;

/// Main error type for jdocgen
#[derive(Debug, Error)]
pub enum JdocError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Go source could not be parsed
    #[error("Parse error in {}{}: {message}", file.display(), format_position(*line, *col))]
    Parse {
        file: PathBuf,
        message: String,
        line: Option<usize>,
        col: Option<usize>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source directory does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// No global project annotations and no configured fallback
    #[error("project information not found: add @title, @version and @description to a file or function comment")]
    MissingProjectInfo,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

fn format_position(line: Option<usize>, col: Option<usize>) -> String {
    match (line, col) {
        (Some(line), Some(col)) => format!(":{}:{}", line, col),
        (Some(line), None) => format!(":{}", line),
        _ => String::new(),
    }
}

impl JdocError {
    /// Create a parse error
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        JdocError::Parse {
            file: file.into(),
            message: message.into(),
            line: None,
            col: None,
        }
    }

    /// Create a parse error with location
    pub fn parse_at(
        file: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        col: usize,
    ) -> Self {
        JdocError::Parse {
            file: file.into(),
            message: message.into(),
            line: Some(line),
            col: Some(col),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        JdocError::Config(message.into())
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        JdocError::Other(message.into())
    }
}

/// Diagnostic codes recorded by the resolution engine and the annotation parser
pub mod codes {
    pub const UNRESOLVED_TYPE: &str = "unresolved-type";
    pub const AMBIGUOUS_TYPE: &str = "ambiguous-type";
    pub const MALFORMED_GENERIC: &str = "malformed-generic";
    pub const ARITY_MISMATCH: &str = "arity-mismatch";
    pub const INVALID_ANNOTATION: &str = "invalid-annotation";
    pub const MISSING_DESCRIPTION: &str = "missing-description";
    pub const MULTIPLE_RESULTS: &str = "multiple-results";
    pub const DUPLICATE_DECLARATION: &str = "duplicate-declaration";
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Error - the affected item is left out of the output
    Error,
    /// Warning - doc generation continues
    Warning,
    /// Info - informational message
    Info,
    /// Hint - suggestion for improvement
    Hint,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
            DiagnosticSeverity::Hint => "hint",
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Line number (1-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Column number (0-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    /// Diagnostic code (see [`codes`])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            line: None,
            col: None,
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    /// Set the source file
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the location
    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.line = Some(line);
        self.col = Some(col);
        self
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Format the location prefix (`file:line:col`), empty when unknown
    pub fn location(&self) -> String {
        let mut result = String::new();
        if let Some(ref file) = self.file {
            result.push_str(&file.display().to_string());
            result.push_str(&format_position(self.line, self.col));
        }
        result
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = self.location();
        if !result.is_empty() {
            result.push_str(": ");
        }

        result.push_str(self.severity.display());

        if let Some(ref code) = self.code {
            result.push('[');
            result.push_str(code);
            result.push(']');
        }

        result.push_str(": ");
        result.push_str(&self.message);

        result
    }
}

/// Collector for diagnostics during doc generation
///
/// Every diagnostic added is also emitted as a `debug` event so that
/// `JDOCGEN_LOG=debug` shows findings interleaved with the pipeline steps.
/// Reporting them to the user is left to [`crate::printer::DiagnosticsPrinter`].
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            severity = diagnostic.severity.display(),
            "{}",
            diagnostic.format()
        );
        self.diagnostics.push(diagnostic);
    }

    /// Add an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::error(message));
    }

    /// Add a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::warning(message));
    }

    /// Add an info message
    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::info(message));
    }

    /// Move every diagnostic of `other` into this collector
    pub fn extend(&mut self, other: DiagnosticsCollector) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Attach a location to every diagnostic that has no file yet
    pub fn located(mut self, file: impl Into<PathBuf>, line: usize, col: usize) -> Self {
        let file = file.into();
        for diagnostic in self.diagnostics.iter_mut().filter(|d| d.file.is_none()) {
            diagnostic.file = Some(file.clone());
            diagnostic.line = Some(line);
            diagnostic.col = Some(col);
        }
        self
    }

    /// Consume the collector
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics carrying the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics
            .iter()
            .filter(move |d| d.code.as_deref() == Some(code))
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .count()
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}
