//! JSON table format: `{"columns": [...], "rows": [[...], ...]}`.

use serde::Deserialize;
use serde_json::Value;

use super::{Table, TableCodec};
use crate::errors::TableError;

/// Table codec backed by serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTableCodec {
    /// Pretty-print output
    pub pretty: bool,
}

#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl JsonTableCodec {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    // Spreadsheet cells are not always strings; numbers and booleans are kept
    // as their JSON text and nulls become empty cells.
    fn cell_to_string(value: Value) -> Result<String, TableError> {
        match value {
            Value::String(s) => Ok(s),
            Value::Null => Ok(String::new()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(TableError::Decode(format!("unsupported cell value: {}", other))),
        }
    }
}

impl TableCodec for JsonTableCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn read(&self, bytes: &[u8]) -> Result<Table, TableError> {
        let raw: RawTable = serde_json::from_slice(bytes)
            .map_err(|e| TableError::Decode(e.to_string()))?;

        let mut table = Table::new(raw.columns);
        for row in raw.rows {
            let cells = row
                .into_iter()
                .map(Self::cell_to_string)
                .collect::<Result<Vec<_>, _>>()?;
            table.push_row(cells)?;
        }
        Ok(table)
    }

    fn write(&self, table: &Table) -> Result<Vec<u8>, TableError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(table)
        } else {
            serde_json::to_vec(table)
        };
        encoded.map_err(|e| TableError::Encode(e.to_string()))
    }
}
