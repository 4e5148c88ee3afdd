//! Between Command Line Interface
//!
//! Compiles a Between document into TypeScript, Go or Between source. The
//! output format follows the output file extension.
//!
//! # Usage
//!
//! ```bash
//! between --input models.bt --output web/models.ts
//! between --input models.bt --output api/models.go --go-package-name api
//! between --input models.bt --output normalized.bt
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use between::{compile, generate, BetweenError, GoOptions, OutputFormat};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "between")]
#[command(version)]
#[command(about = "Generate TypeScript and Go types from Between IDL documents")]
#[command(long_about = None)]
struct Cli {
    /// Between source file
    #[arg(long)]
    input: PathBuf,

    /// Output file; the extension selects the format (.ts, .go or .bt)
    #[arg(long)]
    output: PathBuf,

    /// Package name for Go output (defaults to the output file name)
    #[arg(long)]
    go_package_name: Option<String>,

    /// Log pipeline progress to stderr
    #[arg(long, short)]
    verbose: bool,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "between=debug,between_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// PIPELINE
// =============================================================================

fn run(cli: &Cli) -> Result<(), String> {
    let format = OutputFormat::from_path(&cli.output).map_err(|e| e.to_string())?;

    let source = std::fs::read_to_string(&cli.input)
        .map_err(|e| format!("Failed to read '{}': {}", cli.input.display(), e))?;
    tracing::info!(input = %cli.input.display(), ?format, "Compiling");

    let compiled = compile(&source).map_err(|errors| {
        report(&cli.input, &errors);
        format!("{} error(s) in '{}'", errors.len(), cli.input.display())
    })?;

    let go_options = GoOptions::new(
        cli.go_package_name
            .clone()
            .unwrap_or_else(|| default_package_name(&cli.output)),
    );
    let output = generate(&compiled, format, &go_options);

    std::fs::write(&cli.output, output)
        .map_err(|e| format!("Failed to write '{}': {}", cli.output.display(), e))?;

    tracing::info!(
        output = %cli.output.display(),
        definitions = compiled.definitions.len(),
        "Wrote output"
    );
    Ok(())
}

/// Print errors as `path:line:col: message`, 1-based.
fn report(path: &Path, errors: &[BetweenError]) {
    for error in errors {
        match error.location() {
            Some(location) => eprintln!("{}:{}: {}", path.display(), location, error),
            None => eprintln!("{}: {}", path.display(), error),
        }
    }
}

/// File name up to its first `.`.
fn default_package_name(output: &Path) -> String {
    output
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default()
        .to_string()
}
