// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use subtab::app_config::{self, Config};
use subtab::app_controller::{Controller, Tool};
use subtab::conversions::SentenceFormat;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SentenceFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSentenceFormat {
    Table,
    Srt,
}

impl From<CliSentenceFormat> for SentenceFormat {
    fn from(cli_format: CliSentenceFormat) -> Self {
        match cli_format {
            CliSentenceFormat::Table => SentenceFormat::Table,
            CliSentenceFormat::Srt => SentenceFormat::Srt,
        }
    }
}

/// Options shared by every conversion command
#[derive(Args, Debug)]
struct RunArgs {
    /// Input files or directories (searched recursively)
    #[arg(value_name = "INPUT_PATH", required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory (defaults to the first input's folder)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Report input the parsers had to drop
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert WebVTT files into tables (one row per text line)
    VttToTable {
        #[command(flatten)]
        run: RunArgs,

        /// Emit only the Text column
        #[arg(long)]
        text_only: bool,
    },

    /// Convert SubRip files into tables (one row per block)
    SrtToTable {
        #[command(flatten)]
        run: RunArgs,

        /// Emit only the Text column
        #[arg(long)]
        text_only: bool,

        /// Write one table per cue, named after the cue id
        #[arg(long)]
        single_files: bool,
    },

    /// Convert tables with a Text column into SubRip with zero timestamps
    TableToSrt {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Convert tables into WebVTT
    TableToVtt {
        #[command(flatten)]
        run: RunArgs,

        /// Column holding the cue start
        #[arg(long)]
        start_column: Option<String>,

        /// Column holding the cue end
        #[arg(long)]
        end_column: Option<String>,

        /// Column holding the cue text
        #[arg(long)]
        text_column: Option<String>,
    },

    /// Merge caption rows into full sentences
    Sentences {
        #[command(flatten)]
        run: RunArgs,

        /// Column holding the caption text
        #[arg(long)]
        text_column: Option<String>,

        /// Trim each row
        #[arg(long)]
        trim: bool,

        /// Close rows followed by an uppercase row with a period
        #[arg(long)]
        fix_punctuation: bool,

        /// Only clean the rows, do not merge them
        #[arg(long)]
        no_combine: bool,

        /// Write a table or a SubRip file
        #[arg(long, value_enum)]
        format: Option<CliSentenceFormat>,
    },

    /// Combine the Text column of several tables into one table
    Combine {
        #[command(flatten)]
        run: RunArgs,

        /// Trim each row before joining
        #[arg(long)]
        trim: bool,

        /// Close the running text with a period before an uppercase row
        #[arg(long)]
        add_period: bool,
    },

    /// Generate shell completions for subtab
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subtab - subtitle and table conversion toolkit
///
/// Converts WebVTT and SubRip files to and from tables, rebuilds sentences
/// from caption fragments and combines caption tables.
#[derive(Parser, Debug)]
#[command(name = "subtab")]
#[command(version)]
#[command(about = "Subtitle and table conversion toolkit")]
#[command(long_about = "subtab converts subtitle files to and from tables and cleans up caption text.

EXAMPLES:
    subtab vtt-to-table lecture.vtt                  # One table row per caption line
    subtab srt-to-table --single-files -o out/ ep1.srt
    subtab table-to-srt script.json                  # Zero-timestamp SRT with clean punctuation
    subtab table-to-vtt --text-column Line clip.json
    subtab sentences --trim --fix-punctuation talk.json
    subtab sentences --format srt talk.json          # Sentences as SubRip blocks
    subtab combine -o out/ tables/                   # One row per input table
    subtab completions bash > subtab.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subtab", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let Some((tool, run)) = apply_command(cli.command, &mut config) else {
        return Ok(());
    };
    if run.strict {
        config.parsing.strict = true;
    }

    let controller = Controller::with_config(config)?;
    controller
        .run(tool, &run.inputs, run.output_dir, run.force_overwrite)
        .await?;

    Ok(())
}

/// Fold command-line overrides into the configuration
fn apply_command(command: Commands, config: &mut Config) -> Option<(Tool, RunArgs)> {
    let selected = match command {
        Commands::VttToTable { run, text_only } => {
            config.parsing.text_only |= text_only;
            (Tool::VttToTable, run)
        }
        Commands::SrtToTable {
            run,
            text_only,
            single_files,
        } => {
            config.parsing.text_only |= text_only;
            (Tool::SrtToTable { single_files }, run)
        }
        Commands::TableToSrt { run } => (Tool::TableToSrt, run),
        Commands::TableToVtt {
            run,
            start_column,
            end_column,
            text_column,
        } => {
            if let Some(column) = start_column {
                config.vtt_export.start_column = column;
            }
            if let Some(column) = end_column {
                config.vtt_export.end_column = column;
            }
            if let Some(column) = text_column {
                config.vtt_export.text_column = column;
            }
            (Tool::TableToVtt, run)
        }
        Commands::Sentences {
            run,
            text_column,
            trim,
            fix_punctuation,
            no_combine,
            format,
        } => {
            if let Some(column) = text_column {
                config.sentences.text_column = column;
            }
            config.sentences.trim |= trim;
            config.sentences.fix_punctuation |= fix_punctuation;
            if no_combine {
                config.sentences.combine = false;
            }
            if let Some(format) = format {
                config.sentences.output_format = format.into();
            }
            (Tool::Sentences, run)
        }
        Commands::Combine { run, trim, add_period } => {
            config.combine.trim |= trim;
            config.combine.add_period |= add_period;
            (Tool::Combine, run)
        }
        Commands::Completions { .. } => return None,
    };
    Some(selected)
}

/// Load the configuration file, creating a default one when it does not exist
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path).context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config =
            serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}
