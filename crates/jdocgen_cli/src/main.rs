//! CLI entrypoint.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use jdocgen::{DiagnosticsPrinter, DocBuilder, JdocConfig, OutputFormat, ResolutionMode};
use tracing_subscriber::EnvFilter;

/// Output formats accepted by `--format`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Single Markdown document
    Markdown,
    /// JSON dump of the resolved documentation
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => Self::Markdown,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Resolution modes accepted by `--resolution`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResolutionArg {
    /// Only scoped lookups
    Strict,
    /// Fall back to a search by bare name across packages
    Permissive,
}

impl From<ResolutionArg> for ResolutionMode {
    fn from(arg: ResolutionArg) -> Self {
        match arg {
            ResolutionArg::Strict => Self::Strict,
            ResolutionArg::Permissive => Self::Permissive,
        }
    }
}

/// Generate API documentation from annotated Go JSON-RPC handlers.
#[derive(Parser, Debug)]
#[command(name = "jdocgen", version, about)]
struct Cli {
    /// Root directory of the Go project
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave out the JSON-RPC 2.0 section
    #[arg(long, default_value_t = false)]
    omit_rfc: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// How references that miss the scoped lookup are handled
    #[arg(long, value_enum)]
    resolution: Option<ResolutionArg>,

    /// Configuration file (defaults to jdocgen.toml in the project directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Never add a table of contents
    #[arg(long, default_value_t = false)]
    no_toc: bool,

    /// Scan _test.go files too
    #[arg(long, default_value_t = false)]
    include_tests: bool,

    /// Disable colored diagnostics
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Show info diagnostics as well
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    /// Configuration file or discovered config, with flags applied on top
    fn load_config(&self) -> Result<JdocConfig> {
        let mut config = match (&self.config, &self.dir) {
            (Some(path), dir) => {
                let mut config = JdocConfig::load(path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                if let Some(dir) = dir {
                    config.source.dir = dir.clone();
                }
                config
            }
            (None, dir) => {
                let dir = dir.clone().unwrap_or_else(|| PathBuf::from("."));
                JdocConfig::discover(&dir)
                    .with_context(|| format!("failed to read configuration in {}", dir.display()))?
            }
        };

        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format.into();
        }
        if let Some(mode) = self.resolution {
            config.resolution.mode = mode.into();
        }
        if self.omit_rfc {
            config.output.include_rfc = false;
        }
        if self.no_toc {
            config.output.toc = false;
        }
        if self.include_tests {
            config.source.include_tests = true;
        }
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("JDOCGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    tracing::debug!(?config, "effective configuration");

    let output = DocBuilder::from_config(config)
        .build()
        .context("documentation generation failed")?;

    let use_color = !cli.no_color && std::io::stderr().is_terminal();
    DiagnosticsPrinter::new(use_color)
        .with_verbose(cli.verbose)
        .print_to_stderr(&output.diagnostics);

    println!(
        "Documentation successfully generated at {}",
        output.output_path.display()
    );
    tracing::info!(
        commands = output.command_count,
        structures = output.structure_count,
        "done"
    );
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "jdocgen",
            "--dir",
            "/nonexistent/project",
            "--output",
            "out.json",
            "--format",
            "json",
            "--resolution",
            "permissive",
            "--omit-rfc",
            "--no-toc",
        ]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.source.dir, PathBuf::from("/nonexistent/project"));
        assert_eq!(config.output.path, PathBuf::from("out.json"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.resolution.mode, ResolutionMode::Permissive);
        assert!(!config.output.include_rfc);
        assert!(!config.output.toc);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["jdocgen", "--dir", "/nonexistent/project"]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.output.path, PathBuf::from("API_Documentation.md"));
        assert_eq!(config.output.format, OutputFormat::Markdown);
        assert!(config.output.include_rfc);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
