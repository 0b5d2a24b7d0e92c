/*!
 * Error types for the subtab application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Errors that can occur while reading subtitle text
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Input bytes are not valid UTF-8
    #[error("Input is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    /// Strict parsing found input that was dropped
    #[error("Strict parsing dropped {} piece(s) of input", .0.len())]
    DroppedInput(Vec<Diagnostic>),
}

/// Errors that can occur when working with tables
#[derive(Error, Debug)]
pub enum TableError {
    /// A required column is missing
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The table has a text column but no rows
    #[error("Table has no rows")]
    NoRows,

    /// A row has more cells than the table has columns
    #[error("Row {row} has {cells} cells but the table has {columns} columns")]
    RowWidth {
        /// Zero-based row index
        row: usize,
        /// Cells in the row
        cells: usize,
        /// Columns in the table
        columns: usize,
    },

    /// Failed to decode table bytes
    #[error("Failed to decode table: {0}")]
    Decode(String),

    /// Failed to encode a table
    #[error("Failed to encode table: {0}")]
    Encode(String),
}

/// Errors that can occur while converting one input file
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Error with subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error with table access or encoding
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Error from an output sink
    #[error("Sink error: {0}")]
    Sink(String),
}
