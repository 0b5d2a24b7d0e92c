/*!
 * Joins the `Text` column of several tables into one row per table.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::batch::{SkippedInput, file_stem};
use crate::cue::CombinedFileRecord;
use crate::errors::TableError;
use crate::table::{Table, columns};
use crate::text::punctuation::close_before_uppercase;

/// Options for joining rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCombiner {
    /// Trim each row before joining
    #[serde(default)]
    pub trim: bool,

    /// Close the running text with a period before a row starting uppercase
    #[serde(default)]
    pub add_period: bool,
}

/// Records for well-formed tables plus the skip list
#[derive(Debug, Clone, Default)]
pub struct CombineReport {
    pub records: Vec<CombinedFileRecord>,
    pub skipped: Vec<SkippedInput>,
}

impl TableCombiner {
    pub fn new(trim: bool, add_period: bool) -> Self {
        Self { trim, add_period }
    }

    /// Joins one table's texts. Fails on a missing `Text` column or no rows.
    pub fn combine_table(&self, table: &Table) -> Result<String, TableError> {
        let texts = table.column(columns::TEXT)?;
        let (first, rest) = texts.split_first().ok_or(TableError::NoRows)?;

        let mut combined = self.prepare(first);
        for next in rest {
            let next = self.prepare(next);
            if self.add_period {
                close_before_uppercase(&mut combined, &next);
            }
            combined.push(' ');
            combined.push_str(&next);
        }
        Ok(combined)
    }

    /// Combines named tables in order. Decode failures arrive as `Err`.
    pub fn combine<I>(&self, inputs: I) -> CombineReport
    where
        I: IntoIterator<Item = (String, Result<Table, TableError>)>,
    {
        let mut report = CombineReport::default();

        for (name, table) in inputs {
            let outcome = table.and_then(|t| self.combine_table(&t));
            match outcome {
                Ok(text) => {
                    debug!("Combined {} into {} chars", name, text.len());
                    report.records.push(CombinedFileRecord {
                        file_name: file_stem(&name),
                        text,
                    });
                }
                Err(TableError::MissingColumn(column)) => {
                    warn!("Skipping {}: no '{}' column", name, column);
                    report.skipped.push(SkippedInput::missing_structure(name));
                }
                Err(e) => {
                    warn!("Skipping {}: {}", name, e);
                    report.skipped.push(SkippedInput::failed(name, e));
                }
            }
        }

        report
    }

    fn prepare(&self, text: &str) -> String {
        if self.trim {
            text.trim().to_string()
        } else {
            text.to_string()
        }
    }
}
