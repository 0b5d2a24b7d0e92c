use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::batch::{BatchOutcome, BatchReport, InputFile, OutputItem, SkippedInput, run_batch};
use crate::conversions::{Converter, SubtitleFormat};
use crate::file_utils::{FileManager, FileType};
use crate::table::{CueLayout, JsonTableCodec, TableCodec};

// @module: Application controller for conversion runs

/// A conversion tool the controller can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    VttToTable,
    SrtToTable {
        /// One table per cue instead of one per file
        single_files: bool,
    },
    TableToSrt,
    TableToVtt,
    Sentences,
    Combine,
}

impl Tool {
    // @returns: Extension searched for when an input is a directory
    pub fn input_extension(&self, table_extension: &'static str) -> &'static str {
        match self {
            Self::VttToTable => "vtt",
            Self::SrtToTable { .. } => "srt",
            Self::TableToSrt | Self::TableToVtt | Self::Sentences | Self::Combine => table_extension,
        }
    }

    // @returns: Kind of file the tool reads
    pub fn input_type(&self) -> FileType {
        match self {
            Self::VttToTable => FileType::Vtt,
            Self::SrtToTable { .. } => FileType::Srt,
            Self::TableToSrt | Self::TableToVtt | Self::Sentences | Self::Combine => FileType::Table,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::VttToTable => "VTT to table",
            Self::SrtToTable { single_files: false } => "SRT to table",
            Self::SrtToTable { single_files: true } => "SRT to single-cue tables",
            Self::TableToSrt => "Table to SRT",
            Self::TableToVtt => "Table to VTT",
            Self::Sentences => "Sentence reassembly",
            Self::Combine => "Combine tables",
        }
    }
}

/// Main application controller for conversion runs
pub struct Controller {
    // @field: App configuration
    config: Config,
    converter: Converter<JsonTableCodec>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        let converter = Converter::new(JsonTableCodec::pretty()).strict(config.parsing.strict);
        Ok(Self { config, converter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one tool over the given files and directories.
    /// Output goes to `output_dir`, or next to the first input when none is given.
    pub async fn run(
        &self,
        tool: Tool,
        inputs: &[PathBuf],
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<BatchReport> {
        let start_time = std::time::Instant::now();

        let paths = self.collect_inputs(tool, inputs)?;
        let output_dir = match output_dir {
            Some(dir) => dir,
            None => Self::default_output_dir(inputs),
        };
        FileManager::ensure_dir(&output_dir)?;

        info!("{}: {} input file(s)", tool.display_name(), paths.len());
        let (files, unreadable) = Self::read_inputs(&paths).await;

        let progress_bar = Self::progress_bar(files.len() as u64);
        let mut report = self.convert(tool, &files, &progress_bar);
        progress_bar.finish_and_clear();
        report.skipped.extend(unreadable);

        let written = Self::write_items(&mut report, &output_dir, force_overwrite).await;
        self.log_report(&report);

        info!(
            "{} finished in {}: {} file(s) written to {:?}",
            tool.display_name(),
            Self::format_duration(start_time.elapsed()),
            written,
            output_dir
        );
        Ok(report)
    }

    fn convert(&self, tool: Tool, files: &[InputFile], progress_bar: &ProgressBar) -> BatchReport {
        let text_only = self.config.parsing.text_only;
        let converter = &self.converter;

        let tick = |name: &str| {
            progress_bar.set_message(name.to_string());
            progress_bar.inc(1);
        };

        match tool {
            Tool::VttToTable | Tool::SrtToTable { single_files: false } => {
                let format = if tool == Tool::VttToTable {
                    SubtitleFormat::Vtt
                } else {
                    SubtitleFormat::Srt
                };
                let layout = match (format, text_only) {
                    (_, true) => CueLayout::TextOnly,
                    (SubtitleFormat::Vtt, false) => CueLayout::Timed,
                    (SubtitleFormat::Srt, false) => CueLayout::Numbered,
                };
                let mut report = run_batch(files, |input| {
                    tick(&input.name);
                    converter.subtitle_to_table(input, format, layout)
                });
                converter.append_manifest(&mut report, format);
                report
            }
            Tool::SrtToTable { single_files: true } => {
                let layout = if text_only { CueLayout::TextOnly } else { CueLayout::Timed };
                // A lone input writes `{id}.{ext}` directly, batches get a folder per file
                let nested = files.len() > 1;
                run_batch(files, |input| {
                    tick(&input.name);
                    converter.srt_single_files(input, layout, nested.then(|| input.stem()))
                })
            }
            Tool::TableToSrt => run_batch(files, |input| {
                tick(&input.name);
                converter.table_to_srt(input, &self.config.srt_export)
            }),
            Tool::TableToVtt => run_batch(files, |input| {
                tick(&input.name);
                converter.table_to_vtt(input, &self.config.vtt_export)
            }),
            Tool::Sentences => run_batch(files, |input| {
                tick(&input.name);
                converter.sentences(input, &self.config.sentences)
            }),
            Tool::Combine => {
                progress_bar.inc(files.len() as u64);
                converter.combine(files, &self.config.combine)
            }
        }
    }

    /// Expand directories into the files they hold for this tool
    fn collect_inputs(&self, tool: Tool, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let extension = tool.input_extension(self.converter.codec().extension());
        let mut paths = Vec::new();

        for input in inputs {
            if FileManager::dir_exists(input) {
                let found = FileManager::find_files(input, extension)?;
                debug!("Found {} .{} file(s) in {:?}", found.len(), extension, input);
                paths.extend(found);
            } else if FileManager::file_exists(input) {
                let detected = FileManager::detect_file_type(input, self.converter.codec().extension())?;
                if detected != tool.input_type() {
                    warn!("{:?} looks like {:?}, expected {:?}", input, detected, tool.input_type());
                }
                paths.push(input.clone());
            } else {
                return Err(anyhow!("Input does not exist: {:?}", input));
            }
        }

        Ok(paths)
    }

    fn default_output_dir(inputs: &[PathBuf]) -> PathBuf {
        inputs
            .first()
            .map(|input| {
                if input.is_dir() {
                    input.clone()
                } else {
                    input.parent().map(Path::to_path_buf).unwrap_or_default()
                }
            })
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Read every input into memory; unreadable files go straight to the skip list
    async fn read_inputs(paths: &[PathBuf]) -> (Vec<InputFile>, Vec<SkippedInput>) {
        let mut files = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();

        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());

            match tokio::fs::read(path).await {
                Ok(bytes) => files.push(InputFile::new(name, bytes)),
                Err(e) => {
                    error!("Failed to read {:?}: {}", path, e);
                    skipped.push(SkippedInput::failed(name, e));
                }
            }
        }

        (files, skipped)
    }

    /// Write every item; an item that cannot be written moves to the skip list
    async fn write_items(report: &mut BatchReport, output_dir: &Path, force_overwrite: bool) -> usize {
        let mut written = 0;

        for item in std::mem::take(&mut report.items) {
            match Self::write_item(&item, output_dir, force_overwrite).await {
                Ok(true) => {
                    written += 1;
                    report.items.push(item);
                }
                Ok(false) => report.items.push(item),
                Err(e) => {
                    error!("{:#}", e);
                    report.skipped.push(SkippedInput::failed(&item.name, format!("{:#}", e)));
                }
            }
        }

        written
    }

    // @returns: false when an existing file was kept
    async fn write_item(item: &OutputItem, output_dir: &Path, force_overwrite: bool) -> Result<bool> {
        let path = FileManager::output_path(output_dir, &item.name)?;
        if path.exists() && !force_overwrite {
            warn!("Skipping {:?}, file already exists (use -f to force overwrite)", path);
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        tokio::fs::write(&path, &item.bytes)
            .await
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        debug!("Wrote {:?}", path);
        Ok(true)
    }

    fn log_report(&self, report: &BatchReport) {
        for diagnostic in &report.diagnostics {
            warn!("{}", diagnostic);
        }

        if !report.skipped.is_empty() {
            let names: Vec<String> = report.skipped.iter().map(ToString::to_string).collect();
            warn!("Skipped {} file(s): {}", names.len(), names.join(", "));
        }

        match report.outcome() {
            BatchOutcome::Empty => warn!("No output was produced"),
            BatchOutcome::Partial => info!("Converted {} file(s), some were skipped", report.converted.len()),
            BatchOutcome::Complete => info!("Converted {} file(s)", report.converted.len()),
        }
    }

    fn progress_bar(len: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
