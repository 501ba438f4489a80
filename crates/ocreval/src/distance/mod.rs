//! Levenshtein distance and edit scripts over sequences of equatable elements.
//!
//! The generic functions take slices of any `PartialEq` type. The `&str` helpers
//! (`distance`, `editops`) NFC-normalize and split into grapheme clusters first.

pub mod editops;
pub mod engine;
pub mod levenshtein;

pub use editops::{EditKind, EditOp, apply_editops, count_editops, editops, seq_editops, validate_editops};
pub use engine::EditDistanceEngine;
pub use levenshtein::{
    LevenshteinMatrix, distance, levenshtein, levenshtein_matrix, normalized_distance, normalized_levenshtein,
};
