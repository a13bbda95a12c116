//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. None: built-in defaults (four-condition set, `data/` root)
//!
//! Command line flags `--root`, `--output` and `--format` override the file.

use crate::domain::types::{Condition, ConditionSet};
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(format!("unknown output format '{}' (expected csv or jsonl)", other)),
        }
    }
}

fn default_root() -> String {
    "data".to_string()
}

fn default_output() -> String {
    "digit_span_clean.csv".to_string()
}

fn default_format() -> OutputFormat {
    OutputFormat::Csv
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Directory holding the participant_<id> folders
    #[serde(default = "default_root")]
    pub root: String,
    /// Output path, or "-" for stdout
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    /// Replaces the default condition set when present
    #[serde(default)]
    pub conditions: Option<Vec<Condition>>,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    root: String,
    output: String,
    format: OutputFormat,
    conditions: ConditionSet,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            output: default_output(),
            format: default_format(),
            conditions: ConditionSet::default(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path from the CLI argument or environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> Option<String> {
        Self::pick_config_path(cli_path, env::var("CONFIG_FILE").ok())
    }

    fn pick_config_path(cli_path: Option<&str>, env_path: Option<String>) -> Option<String> {
        if let Some(path) = cli_path {
            return Some(path.to_string());
        }
        env_path.filter(|p| !p.is_empty())
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
            .map(|config| Self { config_file: path.display().to_string(), ..config })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let toml_config: TomlConfig = toml::from_str(content)?;

        let conditions = match toml_config.conditions {
            Some(conditions) => ConditionSet::new(conditions)?,
            None => ConditionSet::default(),
        };

        Ok(Self {
            root: toml_config.root,
            output: toml_config.output,
            format: toml_config.format,
            conditions,
            config_file: "inline".to_string(),
        })
    }

    /// Load configuration from the resolved path, or defaults when none is given
    ///
    /// A config file that was asked for but cannot be read or parsed is an error.
    pub fn load(cli_path: Option<&str>) -> anyhow::Result<Self> {
        match Self::resolve_config_path(cli_path) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Override the input root
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Override the output destination
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Override the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder method for tests to swap the condition set
    #[cfg(test)]
    pub fn with_conditions(mut self, conditions: ConditionSet) -> Self {
        self.conditions = conditions;
        self
    }
}
