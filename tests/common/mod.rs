/*!
 * Common test utilities for the subtab test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use subtab::{JsonTableCodec, Table, TableCodec};

/// Two cues, the first spanning two lines
pub const SAMPLE_VTT: &str = "WEBVTT

00:00:01.000 --> 00:00:04.000
This is a test
subtitle.

00:00:05.000 --> 00:00:09.000
It contains multiple entries.
";

/// Three blocks with a trailing newline
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains
multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.

";

/// Routes library logs through the test harness; safe to call more than once
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a table from string rows
pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    Table::with_rows(columns.iter().copied(), rows).expect("rows fit the header")
}

/// Writes a JSON table file into the directory
pub fn create_test_table(dir: &Path, filename: &str, table: &Table) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, JsonTableCodec::default().write(table)?)?;
    Ok(file_path)
}

/// Reads a JSON table file
pub fn read_table(path: &Path) -> Result<Table> {
    Ok(JsonTableCodec::default().read(&fs::read(path)?)?)
}
