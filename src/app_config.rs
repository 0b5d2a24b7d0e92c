use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::combiner::TableCombiner;
use crate::conversions::SentenceOptions;
use crate::table::ColumnMapping;
use crate::text::PunctuationNormalizer;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Subtitle parsing options
    #[serde(default)]
    pub parsing: ParsingConfig,

    /// Punctuation passes for table to SRT
    #[serde(default)]
    pub srt_export: PunctuationNormalizer,

    /// Column mapping for table to VTT
    #[serde(default)]
    pub vtt_export: ColumnMapping,

    /// Sentence tool options
    #[serde(default)]
    pub sentences: SentenceOptions,

    /// Combiner options
    #[serde(default)]
    pub combine: TableCombiner,
}

/// Subtitle parsing options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ParsingConfig {
    /// Collect diagnostics for dropped input
    #[serde(default)]
    pub strict: bool,

    /// Emit only the text column when converting subtitles to tables
    #[serde(default)]
    pub text_only: bool,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("vtt_export.start_column", &self.vtt_export.start_column),
            ("vtt_export.end_column", &self.vtt_export.end_column),
            ("vtt_export.text_column", &self.vtt_export.text_column),
            ("sentences.text_column", &self.sentences.text_column),
        ];

        for (key, column) in named {
            if column.trim().is_empty() {
                return Err(anyhow!("Column name for {} must not be empty", key));
            }
        }

        Ok(())
    }

    /// Parse a configuration from JSON, filling missing sections with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }
}
