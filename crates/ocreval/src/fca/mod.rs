//! Flexible character accuracy.
//!
//! A character accuracy that does not depend on reading order. Lines of the OCR text
//! may be reordered, merged or split relative to the ground truth and still count as
//! correct, following Clausner, Pletschacher and Antonacopoulos, "Flexible character
//! accuracy measure for reading-order-independent evaluation", Pattern Recognition
//! Letters 131 (2020), doi:10.1016/j.patrec.2020.02.003.
//!
//! Deviations from the paper: every ground truth line tied for the longest length is
//! tried in each greedy step, and ties between OCR lines of equal length are broken
//! by their position in the length-sorted pool.
//!
//! ```rust
//! use ocreval::fca::flexible_character_accuracy;
//!
//! let result = flexible_character_accuracy("aaa\nbbb\nccc", "aaa\nbbb");
//! assert!((result.score - 2.0 / 3.0).abs() < 1e-9);
//! ```

pub mod coefficients;
pub mod engine;
pub mod matching;
pub mod part;

pub use coefficients::{CoefficientGrid, CoefficientRange, Coefficients};
pub use engine::{FlexibleCharacterAccuracy, flexible_character_accuracy};
pub use matching::{
    Distance, Match, calculate_penalty, character_accuracy, character_accuracy_for_matches, combine_lines,
    remove_or_split, score_edit_distance,
};
pub use part::{Part, initialize_lines, split_lines};
