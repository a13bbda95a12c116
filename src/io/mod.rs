//! IO modules - reading raw trial logs and writing the dataset
//!
//! This module contains all file IO:
//! - `trial_log` - Parser for raw PsyToolkit digit-span logs
//! - `dataset_writer` - Dataset output to file or stdout (CSV or JSONL)

pub mod dataset_writer;
pub mod trial_log;

// Re-export commonly used types
pub use dataset_writer::{DatasetWriter, Destination};
pub use trial_log::{parse_trial_line, parse_trial_log, read_trial_log};
