//! Dataset egress - writes the digit span table to a file or stdout
//!
//! CSV carries a `participant,condition,digit_span` header and `\n` line
//! endings. JSONL writes one object per record. Record order is the
//! dataset's order, so identical datasets produce identical bytes.

use crate::domain::dataset::{DigitSpanDataset, COLUMNS};
use crate::infra::config::OutputFormat;
use anyhow::Context;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination argument meaning "write to stdout"
pub const STDOUT_DESTINATION: &str = "-";

/// Where the dataset goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn parse(s: &str) -> Self {
        if s == STDOUT_DESTINATION {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(s))
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => write!(f, "<stdout>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Egress writer for the digit span dataset
pub struct DatasetWriter {
    destination: Destination,
    format: OutputFormat,
}

impl DatasetWriter {
    pub fn new(destination: &str, format: OutputFormat) -> Self {
        let destination = Destination::parse(destination);
        debug!(destination = %destination, format = %format.as_str(), "dataset_writer_initialized");
        Self { destination, format }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Write the whole dataset, replacing any existing file
    pub fn write(&self, dataset: &DigitSpanDataset) -> anyhow::Result<()> {
        match &self.destination {
            Destination::Stdout => {
                let stdout = io::stdout();
                write_dataset(stdout.lock(), dataset, self.format)
                    .context("Failed to write dataset to stdout")?;
            }
            Destination::File(path) => {
                write_file(path, dataset, self.format)
                    .with_context(|| format!("Failed to write dataset {}", path.display()))?;
            }
        }

        info!(
            destination = %self.destination,
            format = %self.format.as_str(),
            rows = %dataset.len(),
            "dataset_written"
        );
        Ok(())
    }
}

fn write_file(path: &Path, dataset: &DigitSpanDataset, format: OutputFormat) -> anyhow::Result<()> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_dataset(BufWriter::new(file), dataset, format)
}

/// Serialize a dataset into any writer
pub fn write_dataset<W: Write>(
    mut writer: W,
    dataset: &DigitSpanDataset,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut csv = csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(writer);
            // Header is written explicitly so an empty dataset still has one
            csv.write_record(COLUMNS)?;
            for record in dataset.records() {
                csv.serialize(record)?;
            }
            csv.flush()?;
        }
        OutputFormat::Jsonl => {
            for record in dataset.records() {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
