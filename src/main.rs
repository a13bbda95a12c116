//! digit-span-extract - builds the digit span dataset from raw PsyToolkit logs
//!
//! Reads `<root>/participant_<id>/<condition file>` for every configured
//! condition and writes one `participant,condition,digit_span` row per file
//! found.
//!
//! Module structure:
//! - `domain/` - Core types (TrialOutcome, ConditionSet, DigitSpanDataset)
//! - `io/` - Raw log parsing and dataset output
//! - `services/` - Span resolution, traversal, dataset building
//! - `infra/` - Configuration and run summary
//!
//! Usage:
//!   digit-span-extract
//!   digit-span-extract --config config/dev.toml --root data --output -

use clap::Parser;
use digit_span_extract::infra::{Config, OutputFormat};
use digit_span_extract::io::DatasetWriter;
use digit_span_extract::services::DatasetBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Extract per-condition digit spans into a single dataset
#[derive(Parser, Debug)]
#[command(name = "digit-span-extract", version, about)]
struct Args {
    /// Path to TOML configuration file (falls back to CONFIG_FILE, then defaults)
    #[arg(short, long)]
    config: Option<String>,

    /// Directory containing participant_<id> folders
    #[arg(short, long)]
    root: Option<String>,

    /// Output file, or "-" for stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Output format: csv or jsonl
    #[arg(short, long)]
    format: Option<OutputFormat>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--output -` keeps stdout clean
    // Default: INFO, use RUST_LOG=debug for per-file detail
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        "digit_span_extract_starting"
    );

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(root) = args.root {
        config = config.with_root(root);
    }
    if let Some(output) = args.output {
        config = config.with_output(output);
    }
    if let Some(format) = args.format {
        config = config.with_format(format);
    }

    info!(
        config_file = %config.config_file(),
        root = %config.root(),
        output = %config.output(),
        format = %config.format().as_str(),
        conditions = ?config.conditions().names(),
        "config_loaded"
    );

    let builder = DatasetBuilder::new(config.conditions().clone());
    let extraction = builder.build(config.root())?;

    let writer = DatasetWriter::new(config.output(), config.format());
    writer.write(&extraction.dataset)?;

    extraction.summary.log();
    info!(
        rows = %extraction.dataset.len(),
        destination = %writer.destination(),
        "extraction_complete"
    );

    Ok(())
}
