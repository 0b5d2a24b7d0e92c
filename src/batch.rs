/*!
 * Batch processing with per-file isolation.
 *
 * Each input is converted on its own. A failing input goes to the skip list
 * and the batch carries on; the report distinguishes a batch that produced
 * nothing from one that skipped some inputs.
 */

use log::{debug, warn};
use std::fmt;
use std::path::Path;

use crate::diagnostics::Diagnostic;
use crate::errors::{ConversionError, SubtitleError, TableError};

/// An input file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// File name including extension
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// File name without its extension
    pub fn stem(&self) -> String {
        file_stem(&self.name)
    }

    /// Contents as UTF-8 text
    pub fn text(&self) -> Result<&str, SubtitleError> {
        std::str::from_utf8(&self.bytes)
            .map_err(|e| SubtitleError::InvalidEncoding(format!("{}: {}", self.name, e)))
    }
}

/// Stem of a file name, or the name itself when it has none
pub fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// A produced file, addressable by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputItem {
    /// Relative output path
    pub name: String,
    pub bytes: Vec<u8>,
}

impl OutputItem {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// What one input produced
#[derive(Debug, Clone, Default)]
pub struct FileOutput {
    pub items: Vec<OutputItem>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileOutput {
    pub fn single(item: OutputItem) -> Self {
        Self {
            items: vec![item],
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// An input left out of the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedInput {
    pub name: String,
    /// Error text, if the input failed rather than lacked structure
    pub reason: Option<String>,
}

impl SkippedInput {
    pub fn missing_structure(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: None,
        }
    }

    pub fn failed(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            reason: Some(reason.to_string()),
        }
    }
}

impl fmt::Display for SkippedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{} (Error: {})", self.name, reason),
            None => f.write_str(&self.name),
        }
    }
}

/// Diagnostics of one input, tagged with its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiagnostic {
    pub file: String,
    pub diagnostic: Diagnostic,
}

impl fmt::Display for FileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.diagnostic)
    }
}

/// Overall result of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing was produced
    Empty,
    /// Output was produced but some inputs were skipped
    Partial,
    /// Every input produced output
    Complete,
}

/// Aggregate report of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub items: Vec<OutputItem>,
    pub skipped: Vec<SkippedInput>,
    pub diagnostics: Vec<FileDiagnostic>,
    /// Stems of the inputs that converted, in input order
    pub converted: Vec<String>,
}

impl BatchReport {
    pub fn outcome(&self) -> BatchOutcome {
        if self.items.is_empty() {
            BatchOutcome::Empty
        } else if self.skipped.is_empty() {
            BatchOutcome::Complete
        } else {
            BatchOutcome::Partial
        }
    }

    fn absorb(&mut self, input: &InputFile, output: FileOutput) {
        self.diagnostics.extend(output.diagnostics.into_iter().map(|diagnostic| FileDiagnostic {
            file: input.name.clone(),
            diagnostic,
        }));
        self.items.extend(output.items);
        self.converted.push(input.stem());
    }
}

/// Converts every input in order, collecting failures in the skip list.
/// An input missing a required column is listed by name alone.
pub fn run_batch<F>(inputs: &[InputFile], mut convert: F) -> BatchReport
where
    F: FnMut(&InputFile) -> Result<FileOutput, ConversionError>,
{
    let mut report = BatchReport::default();

    for input in inputs {
        match convert(input) {
            Ok(output) => {
                debug!("Converted {} into {} item(s)", input.name, output.items.len());
                report.absorb(input, output);
            }
            Err(ConversionError::Table(TableError::MissingColumn(column))) => {
                warn!("Skipping {}: no {} column", input.name, column);
                report.skipped.push(SkippedInput::missing_structure(&input.name));
            }
            Err(e) => {
                warn!("Skipping {}: {}", input.name, e);
                report.skipped.push(SkippedInput::failed(&input.name, e));
            }
        }
    }

    report
}
