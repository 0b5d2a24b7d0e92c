use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;
use std::iter::Enumerate;
use std::str::Split;

use crate::cue::CueRecord;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog, Parsed};

// @module: WebVTT parsing and writing

// @const: Cue timing line, matched as a prefix so cue settings are ignored
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2}.\d{3}) --> (\d{2}:\d{2}:\d{2}.\d{3})").unwrap()
});

const HEADER: &str = "WEBVTT";

// @enum: Scan state between lines
#[derive(Debug, Clone, PartialEq, Eq)]
enum VttState {
    // @state: No timing line seen yet
    AwaitingTiming,
    // @state: Text lines attach to this timing pair
    InCue { start_time: String, end_time: String },
}

/// Lazy WebVTT cue iterator.
///
/// Every non-blank line under a timing line becomes its own record, so a
/// two-line cue yields two records with the same timing.
pub struct VttCues<'a> {
    lines: Enumerate<Split<'a, char>>,
    state: VttState,
    diagnostics: DiagnosticLog,
}

impl<'a> VttCues<'a> {
    pub fn new(content: &'a str, strict: bool) -> Self {
        Self {
            lines: content.split('\n').enumerate(),
            state: VttState::AwaitingTiming,
            diagnostics: DiagnosticLog::new(strict),
        }
    }

    /// Diagnostics recorded so far (strict mode only)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_entries()
    }
}

impl Iterator for VttCues<'_> {
    type Item = CueRecord;

    fn next(&mut self) -> Option<CueRecord> {
        for (idx, raw) in self.lines.by_ref() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let line_no = idx + 1;

            if let Some(caps) = TIMING_REGEX.captures(line) {
                self.state = VttState::InCue {
                    start_time: caps[1].to_string(),
                    end_time: caps[2].to_string(),
                };
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            match &self.state {
                VttState::AwaitingTiming => {
                    if line.starts_with(HEADER) {
                        continue;
                    }
                    let kind = if line.contains("-->") {
                        DiagnosticKind::MalformedTiming
                    } else {
                        DiagnosticKind::StrayText
                    };
                    self.diagnostics.record(line_no, kind, line);
                }
                VttState::InCue { start_time, end_time } => {
                    if line.contains("-->") {
                        // Kept as text, but worth flagging
                        self.diagnostics.record(line_no, DiagnosticKind::MalformedTiming, line);
                    }
                    return Some(CueRecord::new(start_time.clone(), end_time.clone(), line));
                }
            }
        }
        None
    }
}

/// WebVTT parser settings
#[derive(Debug, Clone, Copy, Default)]
pub struct VttParser {
    /// Record diagnostics for dropped or suspicious lines
    pub strict: bool,
}

impl VttParser {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn cues<'a>(&self, content: &'a str) -> VttCues<'a> {
        VttCues::new(content, self.strict)
    }

    pub fn parse(&self, content: &str) -> Parsed<CueRecord> {
        let mut cues = self.cues(content);
        let items: Vec<CueRecord> = cues.by_ref().collect();
        debug!("Parsed {} VTT cue line(s)", items.len());
        Parsed {
            items,
            diagnostics: cues.into_diagnostics(),
        }
    }
}

/// Parses WebVTT text leniently
pub fn parse_vtt(content: &str) -> Vec<CueRecord> {
    VttCues::new(content, false).collect()
}

/// Writes cues as WebVTT, echoing timing tokens verbatim
pub fn write_vtt(cues: &[CueRecord]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for cue in cues {
        // Writing to a String cannot fail
        let _ = write!(out, "{} --> {}\n{}\n\n", cue.start_time, cue.end_time, cue.text);
    }
    out
}
