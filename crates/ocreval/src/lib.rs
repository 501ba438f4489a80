//! ocreval - OCR Evaluation Library
//!
//! ocreval compares OCR output with its ground truth. It computes grapheme-aware edit
//! distances and edit scripts, aligns texts for diff rendering, and scores OCR with
//! character/word error rates and the reading-order-independent flexible character
//! accuracy.
//!
//! # Quick Start
//!
//! ```rust
//! use ocreval::{EvaluationConfig, Metric, evaluate};
//!
//! # fn main() -> ocreval::Result<()> {
//! let config = EvaluationConfig {
//!     metrics: vec![Metric::Cer, Metric::Fca],
//!     ..Default::default()
//! };
//! let report = evaluate("Eight happy frogs\nscuba dived", "scuba dived\nEight happy frogs", &config)?;
//! assert_eq!(report.get("fca").map(|r| r.accuracy()), Some(1.0));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Text** (`text`): NFC normalization, grapheme clusters and word segmentation
//! - **Distance** (`distance`): Levenshtein distance and edit scripts over any `PartialEq` sequence
//! - **Align** (`align`): lazy pairwise alignment along an edit script
//! - **FCA** (`fca`): flexible character accuracy with a configurable coefficient grid
//! - **Metrics** (`metrics`): CER/WER, character/word accuracy and bag-of-X accuracies
//! - **Core** (`core`): configuration loading and metric orchestration
//!
//! # Features
//!
//! - `parallel` (default): evaluate the coefficient grid with rayon

#![deny(unsafe_code)]

pub mod align;
pub mod cache;
pub mod core;
pub mod distance;
pub mod error;
pub mod fca;
pub mod metrics;
pub mod text;
pub mod types;

pub use error::{OcrEvalError, Result};

pub use align::{Alignment, AlignmentPair, align, align_lines, seq_align, seq_align_with};
pub use cache::{CacheStats, MemoCache};
pub use core::config::{EvaluationConfig, FcaConfig, Metric};
pub use core::evaluator::{Evaluator, evaluate};
pub use distance::{EditDistanceEngine, EditKind, EditOp, distance, editops, seq_editops};
pub use fca::{Coefficients, FlexibleCharacterAccuracy, flexible_character_accuracy};
pub use metrics::{
    MetricResult, Weights, bag_of_chars_accuracy, bag_of_words_accuracy, character_accuracy, character_error_rate,
    character_error_rate_n, word_accuracy, word_error_rate, word_error_rate_n,
};
pub use text::{GraphemeSequence, WordSegmenter, chars_normalized, words_normalized};
pub use types::{EvaluationReport, FcaResult};
