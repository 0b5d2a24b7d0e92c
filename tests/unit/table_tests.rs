/*!
 * Tests for tables and the JSON table codec
 */

use subtab::table::{cues_to_table, table_to_cues};
use subtab::{ColumnMapping, CueLayout, CueRecord, JsonTableCodec, Table, TableCodec, TableError};
use crate::common;

/// Test that a written table reads back unchanged
#[test]
fn test_jsonCodec_writeThenRead_shouldPreserveTable() {
    let table = common::table(&["Start Time", "End Time", "Text"], &[&["a", "b", "Hello"], &["c", "d", ""]]);

    for codec in [JsonTableCodec::default(), JsonTableCodec::pretty()] {
        let bytes = codec.write(&table).unwrap();
        assert_eq!(codec.read(&bytes).unwrap(), table);
    }
}

/// Test that a missing rows key reads as an empty table
#[test]
fn test_jsonCodec_read_withoutRows_shouldBeEmpty() {
    let table = JsonTableCodec::default().read(br#"{"columns": ["Text"]}"#).unwrap();
    assert!(table.is_empty());
    assert!(table.has_column("Text"));
}

/// Test that invalid JSON is a decode error
#[test]
fn test_jsonCodec_read_withGarbage_shouldFailToDecode() {
    let err = JsonTableCodec::default().read(b"not json").unwrap_err();
    assert!(matches!(err, TableError::Decode(_)));
}

/// Test that rows longer than the header are rejected
#[test]
fn test_jsonCodec_read_withLongRow_shouldFail() {
    let err = JsonTableCodec::default()
        .read(br#"{"columns": ["Text"], "rows": [["a", "b"]]}"#)
        .unwrap_err();
    assert!(matches!(err, TableError::RowWidth { row: 0, cells: 2, columns: 1 }));
}

/// Test that cues survive a trip through a table
#[test]
fn test_cuesToTable_thenBack_shouldKeepTimingAndText() {
    let cues = vec![
        CueRecord::new("00:00:01.000", "00:00:02.000", "One"),
        CueRecord::new("00:00:03.000", "00:00:04.000", "Two"),
    ];

    let table = cues_to_table(&cues, CueLayout::Timed);
    let back = table_to_cues(&table, &ColumnMapping::default()).unwrap();

    assert_eq!(back, cues);
}

/// Test that a table with no timing columns cannot be read as cues
#[test]
fn test_tableToCues_withTextOnlyTable_shouldReportMissingColumn() {
    let table = Table::new(["Text"]);
    let err = table_to_cues(&table, &ColumnMapping::default()).unwrap_err();
    assert_eq!(err.to_string(), "Missing column: Start Time");
}
