/*!
 * Conversion tools over in-memory inputs.
 *
 * Each tool takes `InputFile`s, runs the parsers and text passes, and returns
 * addressable `OutputItem`s. Table files are read and written through the
 * configured `TableCodec`.
 */

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::batch::{BatchReport, FileOutput, InputFile, OutputItem, SkippedInput, run_batch};
use crate::combiner::TableCombiner;
use crate::cue::{CueRecord, SentenceRecord};
use crate::errors::{ConversionError, TableError};
use crate::formats::{self, CueSink, SrtParser, VttParser};
use crate::table::{
    self, ColumnMapping, CueLayout, Table, TableCodec, columns, cues_to_table, manifest_table,
    sentences_to_table, table_to_cues,
};
use crate::text::punctuation::{self, PunctuationNormalizer};
use crate::text::SentenceReassembler;

/// Options for the sentence tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceOptions {
    /// Column holding the caption text
    #[serde(default = "table::default_text_column")]
    pub text_column: String,

    /// Trim each row
    #[serde(default)]
    pub trim: bool,

    /// Close rows followed by an uppercase row with a period
    #[serde(default)]
    pub fix_punctuation: bool,

    /// Merge rows into sentences; otherwise only the clean-up runs
    #[serde(default = "default_true")]
    pub combine: bool,

    /// File format of the result
    #[serde(default)]
    pub output_format: SentenceFormat,
}

/// Output format of the sentence tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentenceFormat {
    /// A table through the configured codec
    #[default]
    Table,
    /// SubRip blocks carrying the sentence timings
    Srt,
}

impl Default for SentenceOptions {
    fn default() -> Self {
        Self {
            text_column: table::default_text_column(),
            trim: false,
            fix_punctuation: false,
            combine: true,
            output_format: SentenceFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Which subtitle format a batch came from, for the manifest name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Vtt,
    Srt,
}

impl SubtitleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Vtt => "vtt",
            Self::Srt => "srt",
        }
    }

    fn manifest_stem(self) -> &'static str {
        match self {
            Self::Vtt => "vtt_file_names",
            Self::Srt => "srt_file_names",
        }
    }
}

/// Runs the conversion tools with one table codec
pub struct Converter<C: TableCodec> {
    codec: C,
    strict: bool,
}

impl<C: TableCodec> Converter<C> {
    pub fn new(codec: C) -> Self {
        Self { codec, strict: false }
    }

    /// Collect diagnostics for dropped input
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    fn table_item(&self, stem: &str, table: &Table) -> Result<OutputItem, ConversionError> {
        let bytes = self.codec.write(table)?;
        Ok(OutputItem::new(format!("{}.{}", stem, self.codec.extension()), bytes))
    }

    /// Parses one subtitle file into a table named after its stem
    pub fn subtitle_to_table(
        &self,
        input: &InputFile,
        format: SubtitleFormat,
        layout: CueLayout,
    ) -> Result<FileOutput, ConversionError> {
        let text = input.text()?;
        let parsed = match format {
            SubtitleFormat::Vtt => VttParser::new(self.strict).parse(text),
            SubtitleFormat::Srt => SrtParser::new(self.strict).parse(text),
        };
        debug!("{}: {} cue(s)", input.name, parsed.items.len());

        let table = cues_to_table(&parsed.items, layout);
        let item = self.table_item(&input.stem(), &table)?;
        Ok(FileOutput::single(item).with_diagnostics(parsed.diagnostics))
    }

    /// Converts a batch of subtitle files and appends the file-name manifest
    pub fn subtitle_batch(&self, inputs: &[InputFile], format: SubtitleFormat, layout: CueLayout) -> BatchReport {
        let mut report = run_batch(inputs, |input| self.subtitle_to_table(input, format, layout));
        self.append_manifest(&mut report, format);
        report
    }

    /// Appends the manifest of converted stems, if any input converted
    pub fn append_manifest(&self, report: &mut BatchReport, format: SubtitleFormat) {
        if report.converted.is_empty() {
            return;
        }
        match self.table_item(format.manifest_stem(), &manifest_table(&report.converted)) {
            Ok(item) => report.items.push(item),
            // The per-file items are still valid without the manifest
            Err(e) => error!("Failed to write file-name manifest: {}", e),
        }
    }

    /// Parses an SRT file and hands every cue to `sink` as it is read
    pub fn srt_into_sink<S>(&self, input: &InputFile, sink: &mut S) -> Result<FileOutput, ConversionError>
    where
        S: CueSink + ?Sized,
    {
        let text = input.text()?;
        let mut cues = SrtParser::new(self.strict).cues(text);
        let delivered = formats::drain_into(cues.by_ref(), sink)?;
        debug!("{}: {} cue(s) delivered to sink", input.name, delivered);
        Ok(FileOutput::default().with_diagnostics(cues.into_diagnostics()))
    }

    /// Writes every cue of one SRT file as its own table named `{id}.{ext}`,
    /// placed under `directory` when one is given
    pub fn srt_single_files(
        &self,
        input: &InputFile,
        layout: CueLayout,
        directory: Option<String>,
    ) -> Result<FileOutput, ConversionError> {
        let mut sink = TableFileSink::new(self, layout, directory);
        let output = self.srt_into_sink(input, &mut sink)?;
        Ok(FileOutput {
            items: sink.into_items(),
            ..output
        })
    }

    /// Writes every SRT cue of every input as its own table.
    /// Items are named `{stem}/{id}.{ext}` so inputs cannot overwrite each other.
    pub fn srt_single_files_batch(&self, inputs: &[InputFile], layout: CueLayout) -> BatchReport {
        run_batch(inputs, |input| self.srt_single_files(input, layout, Some(input.stem())))
    }

    /// Table to SRT with zero timestamps, after the enabled punctuation passes
    pub fn table_to_srt(
        &self,
        input: &InputFile,
        normalizer: &PunctuationNormalizer,
    ) -> Result<FileOutput, ConversionError> {
        let table = self.codec.read(&input.bytes)?;
        let texts: Vec<String> = table
            .column(columns::TEXT)?
            .into_iter()
            .map(|text| normalizer.normalize(text))
            .collect();

        let srt = formats::write_placeholder_srt(&texts);
        let name = format!("{}_converted_data.srt", input.stem());
        Ok(FileOutput::single(OutputItem::new(name, srt)))
    }

    /// Table to WebVTT through a caller-chosen column mapping
    pub fn table_to_vtt(&self, input: &InputFile, mapping: &ColumnMapping) -> Result<FileOutput, ConversionError> {
        let table = self.codec.read(&input.bytes)?;
        let cues = table_to_cues(&table, mapping)?;
        let vtt = formats::write_vtt(&cues);
        Ok(FileOutput::single(OutputItem::new(format!("{}.vtt", input.stem()), vtt)))
    }

    /// Trims and punctuates the text column, then optionally merges rows into sentences.
    /// The result is a table or, with `SentenceFormat::Srt`, an SRT file.
    pub fn sentences(&self, input: &InputFile, options: &SentenceOptions) -> Result<FileOutput, ConversionError> {
        let mut table = self.codec.read(&input.bytes)?;
        let cleaned = clean_text_column(&table, options)?;
        table.set_column(&options.text_column, cleaned)?;

        let stem = format!("{}_sentences", input.stem());
        let mapping = ColumnMapping {
            text_column: options.text_column.clone(),
            ..ColumnMapping::default()
        };

        if !options.combine {
            let item = match options.output_format {
                SentenceFormat::Table => self.table_item(&stem, &table)?,
                SentenceFormat::Srt => srt_item(&stem, &table_to_cues(&table, &mapping)?),
            };
            return Ok(FileOutput::single(item));
        }

        let rows = table_to_cues(&table, &mapping)?;
        let parsed = SentenceReassembler::new(self.strict).reassemble(&rows);
        info!("{}: {} row(s) merged into {} sentence(s)", input.name, rows.len(), parsed.items.len());

        let item = match options.output_format {
            SentenceFormat::Table => self.table_item(&stem, &sentences_to_table(&parsed.items))?,
            SentenceFormat::Srt => {
                let cues: Vec<CueRecord> = parsed.items.iter().map(SentenceRecord::to_cue).collect();
                srt_item(&stem, &cues)
            }
        };
        Ok(FileOutput::single(item).with_diagnostics(parsed.diagnostics))
    }

    /// Combines tables into one `File Name`/`Text` table.
    /// The combined table is left out when no input qualified.
    pub fn combine(&self, inputs: &[InputFile], combiner: &TableCombiner) -> BatchReport {
        let decoded = inputs
            .iter()
            .map(|input| (input.name.clone(), self.codec.read(&input.bytes)));
        let combined = combiner.combine(decoded);

        let mut report = BatchReport {
            converted: combined.records.iter().map(|r| r.file_name.clone()).collect(),
            skipped: combined.skipped,
            ..BatchReport::default()
        };
        if combined.records.is_empty() {
            return report;
        }

        match self.table_item("combined_files", &table::combined_to_table(&combined.records)) {
            Ok(item) => report.items.push(item),
            Err(e) => report.skipped.push(SkippedInput::failed("combined_files", e)),
        }
        report
    }
}

fn srt_item(stem: &str, cues: &[CueRecord]) -> OutputItem {
    OutputItem::new(format!("{}.srt", stem), formats::write_srt(cues))
}

fn clean_text_column(table: &Table, options: &SentenceOptions) -> Result<Vec<String>, TableError> {
    let mut texts = table.column_owned(&options.text_column)?;
    if options.trim {
        for text in texts.iter_mut() {
            *text = text.trim().to_string();
        }
    }
    if options.fix_punctuation {
        punctuation::insert_cross_row_periods(&mut texts);
    }
    Ok(texts)
}

/// Sink that turns each cue into a one-row table file named after the cue id.
/// Ids that are not plain file names fall back to the cue position; repeated
/// names get a `_{n}` suffix.
pub struct TableFileSink<'c, C: TableCodec> {
    converter: &'c Converter<C>,
    layout: CueLayout,
    directory: Option<String>,
    items: Vec<OutputItem>,
    used_stems: HashSet<String>,
}

impl<'c, C: TableCodec> TableFileSink<'c, C> {
    pub fn new(converter: &'c Converter<C>, layout: CueLayout, directory: Option<String>) -> Self {
        Self {
            converter,
            layout,
            directory,
            items: Vec::new(),
            used_stems: HashSet::new(),
        }
    }

    pub fn into_items(self) -> Vec<OutputItem> {
        self.items
    }

    fn unique_stem(&mut self, cue: &CueRecord) -> String {
        let position = self.items.len() + 1;
        let base = match cue.id.as_deref() {
            Some(id) if is_plain_file_stem(id) => id.to_string(),
            Some(id) => {
                warn!("Cue id {:?} is not a usable file name, using {}", id, position);
                position.to_string()
            }
            None => position.to_string(),
        };

        let mut stem = base.clone();
        let mut n = 1;
        while !self.used_stems.insert(stem.clone()) {
            n += 1;
            stem = format!("{}_{}", base, n);
        }
        if n > 1 {
            warn!("Duplicate cue file name {}, writing {}", base, stem);
        }
        stem
    }
}

/// A single path segment that stays inside the output folder
fn is_plain_file_stem(name: &str) -> bool {
    !name.is_empty() && name != "." && !name.contains("..") && !name.contains(['/', '\\', ':'])
}

impl<C: TableCodec> CueSink for TableFileSink<'_, C> {
    fn accept(&mut self, cue: CueRecord) -> Result<(), ConversionError> {
        let stem = self.unique_stem(&cue);
        let stem = match &self.directory {
            Some(dir) => format!("{}/{}", dir, stem),
            None => stem,
        };
        let table = cues_to_table(std::slice::from_ref(&cue), self.layout);
        let item = self.converter.table_item(&stem, &table)?;
        self.items.push(item);
        Ok(())
    }
}
