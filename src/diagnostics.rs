/*!
 * Reports of input that the lenient parsers drop without complaint.
 *
 * Parsers and the sentence reassembler keep their lenient output either way;
 * in strict mode they also record what they dropped so the caller can
 * surface it.
 */

use std::fmt;

use crate::errors::SubtitleError;

/// What was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Text before any timing line (VTT)
    StrayText,
    /// A line that looked like timing but did not parse
    MalformedTiming,
    /// A block closed by a blank line before id and timing were both read (SRT)
    IncompleteBlock,
    /// A block still open when the input ended (SRT)
    UnterminatedBlock,
    /// Fragments left over without terminal punctuation
    UnterminatedSentence,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StrayText => "text outside any cue",
            Self::MalformedTiming => "malformed timing line",
            Self::IncompleteBlock => "incomplete block",
            Self::UnterminatedBlock => "block not closed by a blank line",
            Self::UnterminatedSentence => "sentence without terminal punctuation",
        };
        f.write_str(label)
    }
}

/// One dropped piece of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line (or row) number where the dropped input starts
    pub line: usize,
    pub kind: DiagnosticKind,
    /// The offending content, for display
    pub content: String,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind, content: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            content: content.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.kind, self.content)
    }
}

/// Items produced by a pass plus what it dropped along the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub items: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Fails if anything was dropped
    pub fn into_strict_result(self) -> Result<Vec<T>, SubtitleError> {
        if self.diagnostics.is_empty() {
            Ok(self.items)
        } else {
            Err(SubtitleError::DroppedInput(self.diagnostics))
        }
    }
}

/// Collects diagnostics only when strict mode is on
#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog {
    strict: bool,
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub(crate) fn new(strict: bool) -> Self {
        Self {
            strict,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, line: usize, kind: DiagnosticKind, content: &str) {
        log::debug!("Dropped {} at line {}: {:?}", kind, line, content);
        if self.strict {
            self.entries.push(Diagnostic::new(line, kind, content));
        }
    }

    pub(crate) fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
