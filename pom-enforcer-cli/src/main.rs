//! POM Enforcer CLI
//!
//! Checks or rewrites Maven project files into canonical order and format.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pom_enforcer::{
    EnforcementReport, EnforcerConfig, DEFAULT_BOM_AT_BEGINNING, DEFAULT_BOM_KEEP_ORDER,
    DEFAULT_DEPENDENCY_SORT, DEFAULT_ENCODING, DEFAULT_FORMAT_SCHEMA_LOCATION,
    DEFAULT_INDENT_SCHEMA_LOCATION, DEFAULT_INDENT_SPACES_NUMBER, DEFAULT_KEEP_BLANK_LINES,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// POM Enforcer
#[derive(Parser)]
#[command(name = "pom-enforcer")]
#[command(version)]
#[command(about = "Enforce canonical element order and formatting in Maven project files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report files that are not in canonical form
    #[command(visible_alias = "c")]
    Check(EnforceArgs),

    /// Rewrite files into canonical form
    #[command(visible_alias = "a")]
    Apply(EnforceArgs),
}

#[derive(Args)]
struct EnforceArgs {
    /// Project files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Declared and output encoding
    #[arg(long, default_value = DEFAULT_ENCODING)]
    encoding: String,

    /// Emit only attributes present in the source
    #[arg(long, action = clap::ArgAction::Set, default_value_t = DEFAULT_FORMAT_SCHEMA_LOCATION)]
    format_schema_location: bool,

    /// Put each root namespace and attribute declaration on its own line
    #[arg(long, action = clap::ArgAction::Set, default_value_t = DEFAULT_INDENT_SCHEMA_LOCATION)]
    indent_schema_location: bool,

    /// Spaces per indentation level
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_INDENT_SPACES_NUMBER as i64)]
    indent_spaces_number: i64,

    /// Keep blank lines between elements
    #[arg(long, action = clap::ArgAction::Set, default_value_t = DEFAULT_KEEP_BLANK_LINES)]
    keep_blank_lines: bool,

    /// Line terminator
    #[arg(long, value_enum, default_value_t = LineSeparator::Lf)]
    line_separator: LineSeparator,

    /// Template file defining element order (default: built-in Maven template)
    #[arg(long)]
    template_order: Option<PathBuf>,

    /// Comma-separated dependency fields to sort by
    #[arg(long, default_value = DEFAULT_DEPENDENCY_SORT)]
    dependency_sort: String,

    /// Place BOM imports before other dependencies
    #[arg(long, action = clap::ArgAction::Set, default_value_t = DEFAULT_BOM_AT_BEGINNING)]
    bom_at_beginning: bool,

    /// Keep BOM imports in their original order
    #[arg(long, action = clap::ArgAction::Set, default_value_t = DEFAULT_BOM_KEEP_ORDER)]
    bom_keep_order: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LineSeparator {
    /// `\n`
    Lf,
    /// `\r\n`
    Crlf,
    /// `\r`
    Cr,
}

impl LineSeparator {
    fn as_str(self) -> &'static str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::Crlf => "\r\n",
            LineSeparator::Cr => "\r",
        }
    }
}

impl EnforceArgs {
    fn config(&self) -> EnforcerConfig {
        EnforcerConfig {
            encoding: self.encoding.clone(),
            format_schema_location: self.format_schema_location,
            indent_schema_location: self.indent_schema_location,
            indent_spaces_number: self.indent_spaces_number,
            keep_blank_lines: self.keep_blank_lines,
            line_separator: self.line_separator.as_str().to_string(),
            template_order: self.template_order.clone(),
            dependency_sort: self.dependency_sort.clone(),
            bom_at_beginning: self.bom_at_beginning,
            bom_keep_order: self.bom_keep_order,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Apply(args) => run_apply(&args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Checks files without modifying them. Succeeds only if every file is
/// canonical.
fn run_check(args: &EnforceArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let enforcer = args.config().build()?;
    let report = enforcer.process_all(&args.files, false);

    for file in report.violated() {
        warn!("{} is not canonical", file.path.display());
        for violation in &file.violations {
            warn!("  {}", violation);
        }
    }
    log_failures(&report);

    info!(
        "checked {} file(s): {} with violations, {} failed, {} skipped",
        report.files.len(),
        report.violated().count(),
        report.failures.len(),
        report.skipped.len()
    );
    Ok(report.is_clean())
}

/// Rewrites files into canonical form. Fails only if a file could not be
/// processed.
fn run_apply(args: &EnforceArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let enforcer = args.config().build()?;
    let report = enforcer.process_all(&args.files, true);

    for file in report.files.iter().filter(|f| f.written) {
        info!("formatted {}", file.path.display());
        for violation in &file.violations {
            info!("  {}", violation);
        }
    }
    log_failures(&report);

    info!(
        "processed {} file(s): {} formatted, {} failed, {} skipped",
        report.files.len(),
        report.files.iter().filter(|f| f.written).count(),
        report.failures.len(),
        report.skipped.len()
    );
    Ok(!report.has_failures())
}

fn log_failures(report: &EnforcementReport) {
    for (_, err) in &report.failures {
        error!("{}", err);
    }
}
