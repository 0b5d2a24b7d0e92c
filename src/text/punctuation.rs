/*!
 * Punctuation and whitespace clean-up for caption text.
 *
 * Within-field passes run in a fixed order:
 * trim, collapse blank lines, period before line break, flatten line breaks,
 * terminal dot. Each one can be switched off on its own.
 *
 * The cross-row pass looks at neighbouring rows instead: a row starting with
 * an uppercase letter closes the previous row with a period.
 */

use serde::{Deserialize, Serialize};

/// Endings that already close a sentence
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Endings that let the next subline follow without a period
const LINE_BREAK_TERMINATORS: [char; 4] = ['.', '!', '?', ','];

/// Endings that let an uppercase row follow without a period
pub const CROSS_ROW_TERMINATORS: [char; 7] = [',', ':', '\'', '"', '?', '!', '.'];

/// Within-field passes and their switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunctuationNormalizer {
    /// Strip leading and trailing whitespace
    #[serde(default = "default_true")]
    pub trim: bool,

    /// Drop empty lines inside the field
    #[serde(default = "default_true")]
    pub collapse_blank_lines: bool,

    /// Close a line with a period when another line follows it
    #[serde(default = "default_true")]
    pub insert_period_before_line_break: bool,

    /// Replace line breaks with spaces
    #[serde(default = "default_true")]
    pub flatten_line_breaks: bool,

    /// Make sure the field ends with terminal punctuation
    #[serde(default = "default_true")]
    pub add_terminal_dot: bool,
}

impl Default for PunctuationNormalizer {
    fn default() -> Self {
        Self::all()
    }
}

fn default_true() -> bool {
    true
}

impl PunctuationNormalizer {
    /// Every pass enabled
    pub fn all() -> Self {
        Self {
            trim: true,
            collapse_blank_lines: true,
            insert_period_before_line_break: true,
            flatten_line_breaks: true,
            add_terminal_dot: true,
        }
    }

    /// Every pass disabled
    pub fn none() -> Self {
        Self {
            trim: false,
            collapse_blank_lines: false,
            insert_period_before_line_break: false,
            flatten_line_breaks: false,
            add_terminal_dot: false,
        }
    }

    /// Runs the enabled passes over one field
    pub fn normalize(&self, text: &str) -> String {
        let mut text = text.to_string();
        if self.trim {
            text = text.trim().to_string();
        }
        if self.collapse_blank_lines {
            text = collapse_blank_lines(&text);
        }
        if self.insert_period_before_line_break {
            text = insert_line_break_periods(&text);
        }
        if self.flatten_line_breaks {
            text = flatten_line_breaks(&text);
        }
        if self.add_terminal_dot {
            text = ensure_terminal_dot(&text);
        }
        text
    }
}

fn ends_with_any(text: &str, endings: &[char]) -> bool {
    text.chars().next_back().is_some_and(|c| endings.contains(&c))
}

/// True when the text closes a sentence
pub fn ends_sentence(text: &str) -> bool {
    ends_with_any(text, &SENTENCE_TERMINATORS)
}

/// Trims every line and drops the empty ones
pub fn collapse_blank_lines(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appends a period to a line followed by a non-empty line, unless it already
/// ends in `. ! ? ,` or consists of whitespace only.
pub fn insert_line_break_periods(text: &str) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();

    for i in (1..lines.len()).rev() {
        let previous = &lines[i - 1];
        // An empty line is not "whitespace only" and does get a period
        let whitespace_only = !previous.is_empty() && previous.chars().all(char::is_whitespace);
        if !lines[i].is_empty() && !ends_with_any(previous, &LINE_BREAK_TERMINATORS) && !whitespace_only {
            lines[i - 1].push('.');
        }
    }

    lines.join("\n")
}

pub fn flatten_line_breaks(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Appends `.` to non-empty text not already ending in `. ! ?`
pub fn ensure_terminal_dot(text: &str) -> String {
    if text.is_empty() || ends_sentence(text) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

/// True when the text would need the previous row closed
pub fn starts_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

/// Closes `previous` with a period when `next` starts a new sentence
pub fn close_before_uppercase(previous: &mut String, next: &str) {
    if starts_uppercase(next) && !ends_with_any(previous, &CROSS_ROW_TERMINATORS) {
        previous.push('.');
    }
}

/// Cross-row pass, in place and in order
pub fn insert_cross_row_periods(rows: &mut [String]) {
    for i in 1..rows.len() {
        let (head, tail) = rows.split_at_mut(i);
        close_before_uppercase(&mut head[i - 1], &tail[0]);
    }
}
