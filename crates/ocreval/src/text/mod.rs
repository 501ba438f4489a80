//! Text adapters that turn strings into the sequences the engines compare.

pub mod graphemes;
pub mod words;

pub use graphemes::{GraphemeSequence, chars_normalized, normalize_nfc};
pub use words::{WordSegmenter, words_normalized};
