use anyhow::{Context, Result};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::translation::{GlossaryConfig, PipelineConfig};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Terminology sources
    #[serde(default)]
    pub terminology: TerminologyConfig,

    /// Pipeline bounds and options
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Glossary unit settings
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Output files
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Locations of the terminology record files.
///
/// A missing path means the built-in seed vocabulary is used for that table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TerminologyConfig {
    /// Domain (medical) term records
    #[serde(default)]
    pub domain_path: Option<PathBuf>,

    /// General vocabulary records
    #[serde(default)]
    pub general_path: Option<PathBuf>,
}

/// Which output files are written for each document
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Write the serialized document plan (`<stem>.ar.plan.json`)
    #[serde(default = "default_true")]
    pub write_plan: bool,

    /// Write the rendered pages (`<stem>.ar.txt`)
    #[serde(default = "default_true")]
    pub write_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_plan: true,
            write_text: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;

        if self.glossary.enabled && self.glossary.max_entries == 0 {
            return Err(
                AppError::Config("glossary.max_entries must be at least 1 when the glossary is enabled".to_string()).into(),
            );
        }

        if !self.output.write_plan && !self.output.write_text {
            return Err(
                AppError::Config("At least one of output.write_plan and output.write_text must be enabled".to_string()).into(),
            );
        }

        Ok(())
    }

    /// Load the configuration from a JSON file, writing a default one when
    /// the file does not exist.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config =
                serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config to file: {:?}", path.as_ref()))
    }
}
