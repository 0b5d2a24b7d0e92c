use log::debug;
use std::fmt::{self, Write};
use std::iter::Enumerate;
use std::mem;
use std::str::Split;

use crate::cue::CueRecord;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog, Parsed};

// @module: SubRip parsing and writing

// @const: Separator between the two timing tokens
const TIMING_SEPARATOR: &str = " --> ";

// @const: Timing written when rows carry no timing of their own
const PLACEHOLDER_TIMING: &str = "00:00:00,000 --> 00:00:00,000";

// @enum: Block scan state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum SrtState {
    // @state: Between blocks
    #[default]
    AwaitingId,
    // @state: Id read, timing line next
    AwaitingTime { id: String, first_line: usize },
    // @state: Id and timing read, gathering text lines
    CollectingText {
        id: String,
        start_time: String,
        end_time: String,
        lines: Vec<String>,
        first_line: usize,
    },
    // @state: Timing line was malformed, ignore lines until the next blank one
    Skipping,
}

/// Lazy SubRip cue iterator.
///
/// Lines are trimmed. A blank line closes the current block; a block with id
/// and timing becomes one record whose text is its lines joined by spaces.
/// The end of input does not close a block.
pub struct SrtCues<'a> {
    lines: Enumerate<Split<'a, char>>,
    state: SrtState,
    diagnostics: DiagnosticLog,
    finished: bool,
}

impl<'a> SrtCues<'a> {
    pub fn new(content: &'a str, strict: bool) -> Self {
        Self {
            lines: content.split('\n').enumerate(),
            state: SrtState::AwaitingId,
            diagnostics: DiagnosticLog::new(strict),
            finished: false,
        }
    }

    /// Diagnostics recorded so far (strict mode only)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_entries()
    }

    // @transition: Blank line closes the block (Flush or Discard)
    fn close_block(&mut self) -> Option<CueRecord> {
        match mem::take(&mut self.state) {
            SrtState::CollectingText { id, start_time, end_time, lines, .. } => {
                Some(CueRecord::with_id(id, start_time, end_time, lines.join(" ")))
            }
            SrtState::AwaitingTime { id, first_line } => {
                self.diagnostics.record(first_line, DiagnosticKind::IncompleteBlock, &id);
                None
            }
            SrtState::AwaitingId | SrtState::Skipping => None,
        }
    }

    // @transition: Non-blank line advances the block
    fn advance(&mut self, line: &str, line_no: usize) {
        self.state = match mem::take(&mut self.state) {
            SrtState::AwaitingId => SrtState::AwaitingTime {
                id: line.to_string(),
                first_line: line_no,
            },
            SrtState::AwaitingTime { id, first_line } => match split_timing(line) {
                Some((start_time, end_time)) => SrtState::CollectingText {
                    id,
                    start_time: start_time.to_string(),
                    end_time: end_time.to_string(),
                    lines: Vec::new(),
                    first_line,
                },
                None => {
                    self.diagnostics.record(line_no, DiagnosticKind::MalformedTiming, line);
                    SrtState::Skipping
                }
            },
            SrtState::CollectingText { id, start_time, end_time, mut lines, first_line } => {
                lines.push(line.to_string());
                SrtState::CollectingText { id, start_time, end_time, lines, first_line }
            }
            SrtState::Skipping => SrtState::Skipping,
        };
    }

    fn finish(&mut self) {
        match mem::take(&mut self.state) {
            SrtState::AwaitingTime { id, first_line } => {
                self.diagnostics.record(first_line, DiagnosticKind::UnterminatedBlock, &id);
            }
            SrtState::CollectingText { id, first_line, .. } => {
                self.diagnostics.record(first_line, DiagnosticKind::UnterminatedBlock, &id);
            }
            SrtState::AwaitingId | SrtState::Skipping => {}
        }
        self.finished = true;
    }
}

impl Iterator for SrtCues<'_> {
    type Item = CueRecord;

    fn next(&mut self) -> Option<CueRecord> {
        if self.finished {
            return None;
        }

        while let Some((idx, raw)) = self.lines.next() {
            let line = raw.trim();
            if line.is_empty() {
                if let Some(cue) = self.close_block() {
                    return Some(cue);
                }
            } else {
                self.advance(line, idx + 1);
            }
        }

        self.finish();
        None
    }
}

/// Splits `start --> end` into its two tokens
fn split_timing(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(TIMING_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(end), None) => Some((start, end)),
        _ => None,
    }
}

/// SubRip parser settings
#[derive(Debug, Clone, Copy, Default)]
pub struct SrtParser {
    /// Record diagnostics for discarded blocks
    pub strict: bool,
}

impl SrtParser {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn cues<'a>(&self, content: &'a str) -> SrtCues<'a> {
        SrtCues::new(content, self.strict)
    }

    pub fn parse(&self, content: &str) -> Parsed<CueRecord> {
        let mut cues = self.cues(content);
        let items: Vec<CueRecord> = cues.by_ref().collect();
        debug!("Parsed {} SRT block(s)", items.len());
        Parsed {
            items,
            diagnostics: cues.into_diagnostics(),
        }
    }
}

/// Parses SubRip text leniently
pub fn parse_srt(content: &str) -> Vec<CueRecord> {
    SrtCues::new(content, false).collect()
}

// @struct: One SRT block ready for display
struct SrtBlock<'a> {
    number: &'a str,
    timing: &'a str,
    text: &'a str,
}

impl fmt::Display for SrtBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.number)?;
        writeln!(f, "{}", self.timing)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Writes texts as SRT blocks numbered from 1 with zero timestamps
pub fn write_placeholder_srt<S: AsRef<str>>(texts: &[S]) -> String {
    let mut out = String::new();
    for (i, text) in texts.iter().enumerate() {
        let number = (i + 1).to_string();
        let block = SrtBlock {
            number: &number,
            timing: PLACEHOLDER_TIMING,
            text: text.as_ref(),
        };
        let _ = write!(out, "{}", block);
    }
    out
}

/// Writes cues as SRT blocks with their own timing tokens.
/// A cue without an id is numbered by its 1-based position.
pub fn write_srt(cues: &[CueRecord]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        let number = cue.id.clone().unwrap_or_else(|| (i + 1).to_string());
        let timing = cue.timing_line();
        let block = SrtBlock {
            number: &number,
            timing: &timing,
            text: &cue.text,
        };
        let _ = write!(out, "{}", block);
    }
    out
}
