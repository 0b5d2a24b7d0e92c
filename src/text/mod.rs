/*!
 * Text passes over parsed caption rows.
 *
 * - `sentences`: merge fragments into full sentences
 * - `punctuation`: whitespace and punctuation clean-up
 */

pub mod punctuation;
pub mod sentences;

pub use punctuation::PunctuationNormalizer;
pub use sentences::{SentenceReassembler, reassemble_sentences};
