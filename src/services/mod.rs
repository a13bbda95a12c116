//! Services - extraction logic
//!
//! This module contains the core extraction services:
//! - `span_resolver` - Reduces trial outcomes to a digit span
//! - `traversal` - Enumerates participant folders and condition files
//! - `dataset_builder` - Applies the skip policy and assembles the dataset

pub mod dataset_builder;
pub mod span_resolver;
pub mod traversal;

// Re-export commonly used types
pub use dataset_builder::{DatasetBuilder, Extraction};
pub use span_resolver::resolve_digit_span;
pub use traversal::{FileOutcome, FileResult, Traversal};
