/*!
 * Tests for error types
 */

use subtab::diagnostics::{Diagnostic, DiagnosticKind};
use subtab::{ConversionError, SubtitleError, TableError};

/// Test table error messages
#[test]
fn test_tableError_display_shouldDescribeProblem() {
    assert_eq!(TableError::MissingColumn("Text".to_string()).to_string(), "Missing column: Text");
    assert_eq!(TableError::NoRows.to_string(), "Table has no rows");
    assert_eq!(
        TableError::RowWidth { row: 2, cells: 4, columns: 3 }.to_string(),
        "Row 2 has 4 cells but the table has 3 columns"
    );
}

/// Test that dropped input reports how much was dropped
#[test]
fn test_subtitleError_droppedInput_shouldCountDiagnostics() {
    let err = SubtitleError::DroppedInput(vec![
        Diagnostic::new(1, DiagnosticKind::StrayText, "x"),
        Diagnostic::new(4, DiagnosticKind::MalformedTiming, "y"),
    ]);
    assert_eq!(err.to_string(), "Strict parsing dropped 2 piece(s) of input");
}

/// Test conversion from table errors into conversion errors
#[test]
fn test_conversionError_fromTableError_shouldWrap() {
    let err: ConversionError = TableError::NoRows.into();
    assert!(matches!(err, ConversionError::Table(TableError::NoRows)));
    assert_eq!(err.to_string(), "Table error: Table has no rows");
}

/// Test diagnostic display
#[test]
fn test_diagnostic_display_shouldShowLineAndContent() {
    let diagnostic = Diagnostic::new(7, DiagnosticKind::IncompleteBlock, "12");
    assert_eq!(diagnostic.to_string(), "line 7: incomplete block (\"12\")");
}
