//! Infrastructure - configuration and run summary
//!
//! This module contains infrastructure concerns:
//! - `config` - Application configuration (TOML loading, defaults, CLI overrides)
//! - `summary` - Counters reported at the end of a run

pub mod config;
pub mod summary;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use summary::RunSummary;
