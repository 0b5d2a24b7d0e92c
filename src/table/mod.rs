/*!
 * Abstract row/column tables.
 *
 * The converters never look inside a spreadsheet format. They work on
 * `Table`, an ordered list of named columns and string rows, and hand it to a
 * `TableCodec` to turn it into bytes. Column access is by name only.
 */

use serde::{Deserialize, Serialize};

use crate::cue::{CombinedFileRecord, CueRecord, SentenceRecord};
use crate::errors::TableError;

pub mod json;

pub use json::JsonTableCodec;

/// Canonical column names
pub mod columns {
    pub const ID: &str = "ID";
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const TEXT: &str = "Text";
    pub const FILE_NAME: &str = "File Name";
    pub const FILE_NAMES: &str = "File Names";
}

/// Reads and writes tables in a concrete file format
pub trait TableCodec {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn read(&self, bytes: &[u8]) -> Result<Table, TableError>;

    fn write(&self, table: &Table) -> Result<Vec<u8>, TableError>;
}

/// Ordered named columns over rows of string cells
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given header
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a table and appends every row through `push_row`
    pub fn with_rows<I, S>(columns: I, rows: Vec<Vec<String>>) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row. Short rows are padded with empty cells.
    pub fn push_row(&mut self, mut row: Vec<String>) -> Result<(), TableError> {
        if row.len() > self.columns.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                cells: row.len(),
                columns: self.columns.len(),
            });
        }
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in the named column
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Values of the named column in row order
    pub fn column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let idx = self.require(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Owned copy of the named column
    pub fn column_owned(&self, name: &str) -> Result<Vec<String>, TableError> {
        let idx = self.require(name)?;
        Ok(self.rows.iter().map(|r| r[idx].clone()).collect())
    }

    /// Replaces the named column's values. `values` must have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), TableError> {
        let idx = self.require(name)?;
        if values.len() != self.rows.len() {
            return Err(TableError::RowWidth {
                row: values.len().min(self.rows.len()),
                cells: values.len(),
                columns: self.rows.len(),
            });
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
        Ok(())
    }

    fn require(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }
}

/// Shape of the table built from parsed cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueLayout {
    /// Start Time, End Time, Text
    Timed,
    /// ID, Start Time, End Time, Text
    Numbered,
    /// Text
    TextOnly,
}

impl CueLayout {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Timed => &[columns::START_TIME, columns::END_TIME, columns::TEXT],
            Self::Numbered => &[columns::ID, columns::START_TIME, columns::END_TIME, columns::TEXT],
            Self::TextOnly => &[columns::TEXT],
        }
    }

    fn row(self, cue: &CueRecord) -> Vec<String> {
        match self {
            Self::Timed => vec![cue.start_time.clone(), cue.end_time.clone(), cue.text.clone()],
            Self::Numbered => vec![
                cue.id.clone().unwrap_or_default(),
                cue.start_time.clone(),
                cue.end_time.clone(),
                cue.text.clone(),
            ],
            Self::TextOnly => vec![cue.text.clone()],
        }
    }
}

/// Which columns hold the timing and text of a cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_start_column")]
    pub start_column: String,

    #[serde(default = "default_end_column")]
    pub end_column: String,

    #[serde(default = "default_text_column")]
    pub text_column: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            start_column: default_start_column(),
            end_column: default_end_column(),
            text_column: default_text_column(),
        }
    }
}

fn default_start_column() -> String {
    columns::START_TIME.to_string()
}

fn default_end_column() -> String {
    columns::END_TIME.to_string()
}

pub(crate) fn default_text_column() -> String {
    columns::TEXT.to_string()
}

/// Builds a table from cues in the given layout
pub fn cues_to_table(cues: &[CueRecord], layout: CueLayout) -> Table {
    let mut table = Table::new(layout.columns().iter().copied());
    table.rows = cues.iter().map(|cue| layout.row(cue)).collect();
    table
}

/// Reads cues back out of a table through a column mapping
pub fn table_to_cues(table: &Table, mapping: &ColumnMapping) -> Result<Vec<CueRecord>, TableError> {
    let starts = table.column(&mapping.start_column)?;
    let ends = table.column(&mapping.end_column)?;
    let texts = table.column(&mapping.text_column)?;

    Ok(starts
        .into_iter()
        .zip(ends)
        .zip(texts)
        .map(|((start, end), text)| CueRecord::new(start, end, text))
        .collect())
}

pub fn sentences_to_table(sentences: &[SentenceRecord]) -> Table {
    let mut table = Table::new([columns::ID, columns::START_TIME, columns::END_TIME, columns::TEXT]);
    table.rows = sentences
        .iter()
        .map(|s| vec![s.id.to_string(), s.start_time.clone(), s.end_time.clone(), s.text.clone()])
        .collect();
    table
}

pub fn combined_to_table(records: &[CombinedFileRecord]) -> Table {
    let mut table = Table::new([columns::FILE_NAME, columns::TEXT]);
    table.rows = records
        .iter()
        .map(|r| vec![r.file_name.clone(), r.text.clone()])
        .collect();
    table
}

/// One-column table listing the stems of the files in a batch
pub fn manifest_table(stems: &[String]) -> Table {
    let mut table = Table::new([columns::FILE_NAMES]);
    table.rows = stems.iter().map(|s| vec![s.clone()]).collect();
    table
}
