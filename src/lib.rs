//! Yolovet: YOLO dataset validation and COCO conversion.
//!
//! Yolovet checks YOLO-format object detection datasets for structural
//! problems (missing, empty, malformed, or out-of-range label files) and
//! converts them into a single aggregated COCO JSON document with
//! absolute pixel coordinates.
//!
//! # Modules
//!
//! - [`label`]: parsing and classification of label rows
//! - [`geom`]: typed bounding boxes and clamping
//! - [`classes`]: category list resolution
//! - [`dataset`]: directory layout and file enumeration
//! - [`validate`]: the validator pipeline and its report
//! - [`convert`]: the converter pipeline and the COCO writer
//! - [`split`]: train/val list generation
//! - [`error`]: error types for yolovet operations

pub mod classes;
pub mod coco;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod geom;
pub mod label;
pub mod split;
pub mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::YolovetError;

use convert::{CategoryIdPolicy, ConvertOptions};
use geom::DegeneratePolicy;
use split::SplitOptions;
use validate::ValidationLog;

/// The yolovet CLI application.
#[derive(Parser)]
#[command(name = "yolovet")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a YOLO dataset and report a quality score.
    Validate(ValidateArgs),
    /// Convert a YOLO dataset to one aggregated COCO JSON document.
    Convert(ConvertArgs),
    /// Split a dataset's images into train/val lists.
    Split(SplitArgs),
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Image directory.
    images: PathBuf,

    /// Label directory.
    labels: PathBuf,

    /// Log file path (default: yolo_validation_<timestamp>.log).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Exit non-zero if any errors are found.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Dataset root: images/ + labels/, or train/val/test partitions.
    input: PathBuf,

    /// Output JSON path.
    #[arg(short, long)]
    output: PathBuf,

    /// Class names file, one name per line.
    #[arg(long)]
    classes: Option<PathBuf>,

    /// Degenerate-box policy ('clamp-min' or 'discard').
    #[arg(long, default_value = "clamp-min")]
    degenerate: String,

    /// Category id policy ('trust' or 'remap').
    #[arg(long, default_value = "trust")]
    category_ids: String,

    /// Partition to convert (repeatable); default: auto-discover.
    #[arg(long = "partition")]
    partitions: Vec<String>,
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
struct SplitArgs {
    /// Dataset root containing images/.
    root: PathBuf,

    /// Fraction of images assigned to the training list.
    #[arg(long, default_value_t = 0.8)]
    ratio: f64,

    /// Shuffle seed for reproducible splits.
    #[arg(long)]
    seed: Option<u64>,
}

/// Run the yolovet CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), YolovetError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Split(args)) => run_split(args),
        None => {
            println!("yolovet {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("YOLO dataset validation and COCO conversion.");
            println!();
            println!("Run 'yolovet --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), YolovetError> {
    let log_path = args.log_file.unwrap_or_else(|| {
        PathBuf::from(format!(
            "yolo_validation_{}.log",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ))
    });

    let mut log = ValidationLog::create(&log_path, &args.images, &args.labels)?;
    let report = validate::validate_dataset(&args.images, &args.labels, &mut log)?;

    print!("{}", report);
    println!();
    println!("fix suggestions:");
    for suggestion in report.suggestions() {
        println!("- {}", suggestion);
    }
    println!();
    println!("full log written to {}", log.path().display());

    if args.strict && report.error_count() > 0 {
        return Err(YolovetError::ValidationFailed {
            error_count: report.error_count(),
        });
    }

    Ok(())
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), YolovetError> {
    let degenerate = match args.degenerate.as_str() {
        "clamp-min" => DegeneratePolicy::ClampToMinimum,
        "discard" => DegeneratePolicy::DiscardDegenerate,
        other => {
            return Err(YolovetError::UnsupportedOption(format!(
                "--degenerate '{}' (supported: clamp-min, discard)",
                other
            )));
        }
    };

    let category_ids = match args.category_ids.as_str() {
        "trust" => CategoryIdPolicy::TrustSource,
        "remap" => CategoryIdPolicy::Remap,
        other => {
            return Err(YolovetError::UnsupportedOption(format!(
                "--category-ids '{}' (supported: trust, remap)",
                other
            )));
        }
    };

    let opts = ConvertOptions {
        degenerate,
        category_ids,
        names_file: args.classes,
        partitions: args.partitions,
    };

    let report = convert::convert_dataset(&args.input, &args.output, &opts)?;

    println!(
        "Converted {} -> {}:",
        args.input.display(),
        args.output.display()
    );
    print!("{}", report);

    Ok(())
}

/// Execute the split subcommand.
fn run_split(args: SplitArgs) -> Result<(), YolovetError> {
    let opts = SplitOptions {
        ratio: args.ratio,
        seed: args.seed,
    };

    let report = split::split_dataset(&args.root, &opts)?;

    println!("Split {}:", args.root.display());
    print!("{}", report);

    Ok(())
}
