//! Terminal diagnostics printer
//!
//! Prints diagnostics and the run summary with colored severities.
//!
//! # Example
//!
//! ```no_run
//! use jdocgen::diagnostics::Diagnostic;
//! use jdocgen::printer::DiagnosticsPrinter;
//!
//! let diagnostics = vec![Diagnostic::warning("type 'Stats' not found")];
//! DiagnosticsPrinter::new(true).print_to_stderr(&diagnostics);
//! ```

use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Colored printer for diagnostics
pub struct DiagnosticsPrinter {
    /// Whether to use colored output
    use_color: bool,
    /// Whether info and hint diagnostics are shown
    verbose: bool,
}

impl DiagnosticsPrinter {
    /// Create a new printer
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            verbose: false,
        }
    }

    /// Also show info and hint diagnostics
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Print diagnostics and a summary to stderr
    pub fn print_to_stderr(&self, diagnostics: &[Diagnostic]) {
        let choice = if self.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);
        if let Err(e) = self.write_colored(&mut stderr, diagnostics) {
            eprintln!("Error printing diagnostics: {}", e);
        }
    }

    /// Write diagnostics and a summary to a WriteColor implementor
    pub fn write_colored<W: WriteColor>(
        &self,
        w: &mut W,
        diagnostics: &[Diagnostic],
    ) -> io::Result<()> {
        for diagnostic in diagnostics.iter().filter(|d| self.is_shown(d)) {
            self.write_diagnostic(w, diagnostic)?;
        }
        self.write_summary(w, diagnostics)
    }

    fn is_shown(&self, diagnostic: &Diagnostic) -> bool {
        self.verbose
            || matches!(
                diagnostic.severity,
                DiagnosticSeverity::Error | DiagnosticSeverity::Warning
            )
    }

    fn write_diagnostic<W: WriteColor>(
        &self,
        w: &mut W,
        diagnostic: &Diagnostic,
    ) -> io::Result<()> {
        let location = diagnostic.location();
        if !location.is_empty() {
            w.set_color(ColorSpec::new().set_bold(true))?;
            write!(w, "{}: ", location)?;
            w.reset()?;
        }

        w.set_color(
            ColorSpec::new()
                .set_fg(Some(severity_color(diagnostic.severity)))
                .set_bold(true),
        )?;
        write!(w, "{}", diagnostic.severity.display())?;
        if let Some(code) = &diagnostic.code {
            write!(w, "[{}]", code)?;
        }
        w.reset()?;

        writeln!(w, ": {}", diagnostic.message)
    }

    fn write_summary<W: WriteColor>(
        &self,
        w: &mut W,
        diagnostics: &[Diagnostic],
    ) -> io::Result<()> {
        let errors = count(diagnostics, DiagnosticSeverity::Error);
        let warnings = count(diagnostics, DiagnosticSeverity::Warning);
        if errors == 0 && warnings == 0 {
            return Ok(());
        }

        let color = if errors > 0 { Color::Red } else { Color::Yellow };
        w.set_color(ColorSpec::new().set_fg(Some(color)))?;
        writeln!(w, "{}", summary(errors, warnings))?;
        w.reset()
    }
}

fn severity_color(severity: DiagnosticSeverity) -> Color {
    match severity {
        DiagnosticSeverity::Error => Color::Red,
        DiagnosticSeverity::Warning => Color::Yellow,
        DiagnosticSeverity::Info => Color::Cyan,
        DiagnosticSeverity::Hint => Color::Green,
    }
}

fn count(diagnostics: &[Diagnostic], severity: DiagnosticSeverity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

/// Summary line such as `1 error, 2 warnings`
pub fn summary(errors: usize, warnings: usize) -> String {
    format!(
        "{} error{}, {} warning{}",
        errors,
        if errors == 1 { "" } else { "s" },
        warnings,
        if warnings == 1 { "" } else { "s" }
    )
}
