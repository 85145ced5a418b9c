//! QUADRIGA x-mappings CLI
//!
//! Command-line tool for validating x-mappings and producing the mapping matrix.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quadriga_mappings::{
    discover_version_dirs, validate_directory, walk, DirectorySource, MappingError,
    MappingMatrix, MappingValidator, ValidationSummary, WalkOptions, ROOT_SCHEMA,
};

#[derive(Parser)]
#[command(name = "quadriga-mappings")]
#[command(about = "Validate and document x-mappings of the QUADRIGA schema")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the x-mappings of one or more version directories
    Validate(ValidateArgs),
    /// Walk a version directory and write the mapping matrix as JSON
    Matrix(MatrixArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Version directories to check (default: every v* directory in the current directory)
    dirs: Vec<PathBuf>,

    /// Root schema holding @context
    #[arg(long, default_value = ROOT_SCHEMA)]
    root: String,
}

#[derive(Args)]
struct MatrixArgs {
    /// Version directory, e.g. v1.0.0
    dir: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Root schema the walk starts from
    #[arg(long, default_value = ROOT_SCHEMA)]
    root: String,

    /// Display name of the root row
    #[arg(long, default_value = quadriga_mappings::ROOT_LABEL)]
    root_label: String,

    /// Don't append schemas unreachable from the root
    #[arg(long)]
    no_orphans: bool,
}

/// Write output to file or stdout
fn write_output(content: &str, output: Option<&PathBuf>) -> Result<(), MappingError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("Wrote mapping matrix to {}", path.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn print_summary(summary: &ValidationSummary) {
    for report in &summary.reports {
        println!("{}:", report.path);
        for error in &report.errors {
            println!("  {}", error);
        }
        println!();
    }

    println!("{}", "=".repeat(60));
    println!("Validation complete:");
    println!("  Files checked: {}", summary.files_checked);
    println!("  Files with x-mappings: {}", summary.files_with_mappings);
    println!("  Files validated successfully: {}", summary.files_valid);
    println!("  Files with errors: {}", summary.files_with_errors());
    println!("  Total errors: {}", summary.total_errors);
    println!("{}", "=".repeat(60));
}

fn run_validate(args: ValidateArgs) -> Result<bool, MappingError> {
    let dirs = if args.dirs.is_empty() {
        discover_version_dirs(&PathBuf::from("."))?
    } else {
        args.dirs
    };

    if dirs.is_empty() {
        println!("No schema directories found");
        return Ok(true);
    }

    let validator = MappingValidator::default();
    let mut summary = ValidationSummary::default();
    for dir in dirs {
        tracing::info!(dir = %dir.display(), "validating x-mappings");
        let source = DirectorySource::new(dir)?;
        summary.merge(validate_directory(&source, &args.root, &validator)?);
    }

    print_summary(&summary);
    if summary.is_valid() {
        println!("\nAll x-mappings are valid");
    } else {
        println!("\nValidation FAILED");
    }
    Ok(summary.is_valid())
}

fn run_matrix(args: MatrixArgs) -> Result<bool, MappingError> {
    let source = DirectorySource::new(&args.dir)?;
    let options = WalkOptions {
        root_label: Some(args.root_label),
        include_orphans: !args.no_orphans,
        ..WalkOptions::quadriga().with_root(args.root)
    };

    let result = walk(&source, &options)?;
    eprintln!(
        "Walked {} schema files, {} rows ({} orphans, {} internal rows dropped)",
        result.stats.files_visited,
        result.rows.len(),
        result.stats.orphans,
        result.stats.filtered_rows
    );

    let matrix = MappingMatrix::build(&result);
    let output = matrix.to_json_string(args.pretty)?;
    write_output(&output, args.output.as_ref())?;
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Matrix(args) => run_matrix(args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
