use serde::{Deserialize, Serialize};
use std::fmt;

// @module: Record types shared by the parsers, serializers and text passes

// @struct: One timed-text unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueRecord {
    // @field: Block label, SRT only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // @field: Start token in the source format's notation
    pub start_time: String,

    // @field: End token in the source format's notation
    pub end_time: String,

    // @field: Caption text
    pub text: String,
}

impl CueRecord {
    /// Creates a cue without an id, as the VTT parser emits them
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>, text: impl Into<String>) -> Self {
        CueRecord {
            id: None,
            start_time: start_time.into(),
            end_time: end_time.into(),
            text: text.into(),
        }
    }

    /// Creates a cue carrying an SRT block label
    pub fn with_id(
        id: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        CueRecord {
            id: Some(id.into()),
            ..Self::new(start_time, end_time, text)
        }
    }

    /// Timing line as written between the two tokens
    pub fn timing_line(&self) -> String {
        format!("{} --> {}", self.start_time, self.end_time)
    }
}

impl fmt::Display for CueRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(id) = &self.id {
            write!(f, "[{}] ", id)?;
        }
        write!(f, "{}: {}", self.timing_line(), self.text)
    }
}

/// A full sentence rebuilt from consecutive caption fragments.
///
/// `end_time` is whatever the accumulator held when the sentence closed; an
/// empty string means no fragment ever assigned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// 1-based position in reassembly order
    pub id: usize,
    pub start_time: String,
    pub end_time: String,
    pub text: String,
}

impl SentenceRecord {
    /// Views the sentence as a cue so it can go through the cue writers
    pub fn to_cue(&self) -> CueRecord {
        CueRecord::with_id(
            self.id.to_string(),
            self.start_time.clone(),
            self.end_time.clone(),
            self.text.clone(),
        )
    }
}

/// All text of one table file joined into a single string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedFileRecord {
    /// Stem of the originating file
    pub file_name: String,
    pub text: String,
}
