/*!
 * Rebuilds full sentences from caption fragments.
 *
 * Fragments are appended to an accumulator until one ends in `.`, `!` or `?`,
 * at which point the accumulator is emitted as a numbered sentence.
 *
 * The accumulator has two quirks:
 * - `end_time` is only assigned when a fragment is appended to a non-empty
 *   accumulator and is never cleared, so a one-fragment sentence reports the
 *   previous sentence's end (or an empty string for the first sentence).
 * - Fragments left over at the end of the input are dropped.
 */

use log::debug;

use super::punctuation::ends_sentence;
use crate::cue::{CueRecord, SentenceRecord};
use crate::diagnostics::{DiagnosticKind, DiagnosticLog, Parsed};

#[derive(Debug, Default)]
struct Accumulator {
    text: String,
    start_time: String,
    end_time: String,
    counter: usize,
    // Row where the pending sentence began, for diagnostics
    first_row: usize,
}

impl Accumulator {
    fn push(&mut self, row_no: usize, row: &CueRecord) {
        if self.text.is_empty() {
            self.start_time = row.start_time.clone();
            self.text = row.text.clone();
            self.first_row = row_no;
        } else {
            self.text.push(' ');
            self.text.push_str(&row.text);
            self.end_time = row.end_time.clone();
        }
    }

    fn flush(&mut self) -> SentenceRecord {
        self.counter += 1;
        SentenceRecord {
            id: self.counter,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            text: std::mem::take(&mut self.text),
        }
    }
}

/// Sentence reassembly settings
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceReassembler {
    /// Report a trailing unterminated sentence
    pub strict: bool,
}

impl SentenceReassembler {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn reassemble<'r, I>(&self, rows: I) -> Parsed<SentenceRecord>
    where
        I: IntoIterator<Item = &'r CueRecord>,
    {
        let mut acc = Accumulator::default();
        let mut diagnostics = DiagnosticLog::new(self.strict);
        let mut sentences = Vec::new();

        for (idx, row) in rows.into_iter().enumerate() {
            acc.push(idx + 1, row);
            if ends_sentence(&row.text) {
                sentences.push(acc.flush());
            }
        }

        if !acc.text.is_empty() {
            diagnostics.record(acc.first_row, DiagnosticKind::UnterminatedSentence, &acc.text);
        }

        debug!("Reassembled {} sentence(s)", sentences.len());
        Parsed {
            items: sentences,
            diagnostics: diagnostics.into_entries(),
        }
    }
}

/// Reassembles sentences, silently dropping unterminated leftovers
pub fn reassemble_sentences(rows: &[CueRecord]) -> Vec<SentenceRecord> {
    SentenceReassembler::default().reassemble(rows).items
}
