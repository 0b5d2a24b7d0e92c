/*!
 * Timed-text formats.
 *
 * - `vtt`: WebVTT parser (one record per text line) and writer
 * - `srt`: SubRip parser (one record per block) and writers
 *
 * Both parsers are lazy iterators over the input lines, so a caller can
 * collect the cues or hand each one to a `CueSink` as it is parsed.
 */

pub mod srt;
pub mod vtt;

use crate::cue::CueRecord;
use crate::errors::ConversionError;

pub use srt::{SrtCues, SrtParser, parse_srt, write_placeholder_srt, write_srt};
pub use vtt::{VttCues, VttParser, parse_vtt, write_vtt};

/// Receives cues one at a time as a parser yields them
pub trait CueSink {
    fn accept(&mut self, cue: CueRecord) -> Result<(), ConversionError>;
}

impl<F> CueSink for F
where
    F: FnMut(CueRecord) -> Result<(), ConversionError>,
{
    fn accept(&mut self, cue: CueRecord) -> Result<(), ConversionError> {
        self(cue)
    }
}

/// Feeds every cue into `sink`, stopping at the first sink error.
/// Returns the number of cues delivered.
pub fn drain_into<I, S>(cues: I, sink: &mut S) -> Result<usize, ConversionError>
where
    I: IntoIterator<Item = CueRecord>,
    S: CueSink + ?Sized,
{
    let mut delivered = 0;
    for cue in cues {
        sink.accept(cue)?;
        delivered += 1;
    }
    Ok(delivered)
}
