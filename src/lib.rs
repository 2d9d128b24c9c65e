//! Voctext: PASCAL VOC 2005 text annotations, parsed and exported.
//!
//! The VOC 2005 challenge distributed its ground truth as small
//! line-oriented text files. Voctext parses those files into typed records,
//! exports whole annotation trees as one JSON (or CSV) document, and
//! validates the result.
//!
//! # Modules
//!
//! - [`annotation`]: Record types and the text parser
//! - [`export`]: Directory walking and JSON/CSV export
//! - [`validation`]: Data-quality checks and reporting
//! - [`error`]: Error types for voctext operations

pub mod annotation;
pub mod error;
pub mod export;
pub mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use error::VoctextError;

use annotation::{BoxOrderPolicy, ParseOptions};
use export::{ErrorPolicy, ExportDocument, ExportFormat, ExportOptions};

/// The voctext CLI application.
#[derive(Parser)]
#[command(name = "voctext")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse one annotation file and print it as JSON.
    Parse(ParseArgs),
    /// Export every annotation file under a directory.
    Export(ExportArgs),
    /// Validate an export document or an annotation directory.
    Validate(ValidateArgs),
}

/// Arguments for the parse subcommand.
#[derive(clap::Args)]
struct ParseArgs {
    /// Annotation text file.
    input: PathBuf,

    /// Fail on boxes whose min corner lies past their max corner.
    #[arg(long)]
    reject_inverted_boxes: bool,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Root of the annotation tree (e.g. VOC2005_1/Annotations).
    root: PathBuf,

    /// Output file.
    #[arg(short, long)]
    output: PathBuf,

    /// Output format ('json' or 'csv').
    #[arg(long, default_value = "json")]
    format: String,

    /// Annotation file extension; repeat for several. Defaults to 'txt'.
    #[arg(long = "extension", value_name = "EXT")]
    extensions: Vec<String>,

    /// Consider every regular file, whatever its extension.
    #[arg(long, conflicts_with = "extensions")]
    all_files: bool,

    /// Skip files that fail to parse instead of aborting.
    #[arg(long)]
    skip_errors: bool,

    /// Fail on boxes whose min corner lies past their max corner.
    #[arg(long)]
    reject_inverted_boxes: bool,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Export JSON file, or an annotation directory to export in memory.
    input: PathBuf,

    /// Directory that image paths are relative to; enables size checks.
    #[arg(long, env = "VOCTEXT_IMAGES_ROOT")]
    images_root: Option<PathBuf>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the voctext CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), VoctextError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Parse(args)) => run_parse(args),
        Some(Commands::Export(args)) => run_export(args),
        Some(Commands::Validate(args)) => run_validate(args),
        None => {
            println!("voctext {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("PASCAL VOC 2005 text annotation parser and exporter.");
            println!();
            println!("Run 'voctext --help' for usage information.");
            Ok(())
        }
    }
}

fn parse_options(reject_inverted_boxes: bool) -> ParseOptions {
    ParseOptions {
        box_order: if reject_inverted_boxes {
            BoxOrderPolicy::Reject
        } else {
            BoxOrderPolicy::Allow
        },
    }
}

/// Execute the parse subcommand.
fn run_parse(args: ParseArgs) -> Result<(), VoctextError> {
    let record = export::parse_file(&args.input, &parse_options(args.reject_inverted_boxes))?;
    let json = serde_json::to_string_pretty(&record).map_err(|source| {
        VoctextError::ExportJsonWrite {
            path: PathBuf::from("<stdout>"),
            source,
        }
    })?;
    println!("{}", json);
    Ok(())
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), VoctextError> {
    let format = ExportFormat::from_name(&args.format)?;

    let mut opts = ExportOptions {
        parse: parse_options(args.reject_inverted_boxes),
        on_error: if args.skip_errors {
            ErrorPolicy::Skip
        } else {
            ErrorPolicy::Abort
        },
        ..Default::default()
    };
    if args.all_files {
        opts.extensions.clear();
    } else if !args.extensions.is_empty() {
        opts.extensions = args.extensions;
    }

    let (document, report) = export::export_dir(&args.root, &opts)?;
    export::write_export(&args.output, &document, format)?;

    println!(
        "Exported {} -> {} ({})",
        args.root.display(),
        args.output.display(),
        args.format
    );
    print!("{}", report);
    if !report.is_complete() {
        println!();
        println!("Note: skipped files are not part of the exported document.");
    }
    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), VoctextError> {
    let document = load_document(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
        images_root: args.images_root,
    };
    let report = validation::validate_document(&document, &opts);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&ReportJson {
                error_count: report.error_count(),
                warning_count: report.warning_count(),
                issues: &report.issues,
            })
            .map_err(|source| VoctextError::ExportJsonWrite {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
            println!("{}", json);
        }
        "text" => print!("{}", report),
        other => {
            return Err(VoctextError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    let has_errors = !report.is_ok();
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(VoctextError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct ReportJson<'a> {
    error_count: usize,
    warning_count: usize,
    issues: &'a [validation::ValidationIssue],
}

fn load_document(input: &Path) -> Result<ExportDocument, VoctextError> {
    if input.is_dir() {
        let (document, _) = export::export_dir(input, &ExportOptions::default())?;
        Ok(document)
    } else {
        export::io_json::read_export_json(input)
    }
}
