//! Error rates and accuracies comparing an OCR result with its ground truth.
//!
//! Rates are relative to the reference length. A reference of length zero does not
//! raise an error: the rate is `0` when nothing differs and `f64::INFINITY` otherwise.

use crate::distance::{count_editops, levenshtein, seq_editops};
use crate::error::{OcrEvalError, Result};
use crate::fca::FlexibleCharacterAccuracy;
use crate::text::{chars_normalized, words_normalized};
use ahash::AHashMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::hash::Hash;

/// Cost of each edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub deletes: u32,
    pub inserts: u32,
    pub replacements: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            deletes: 1,
            inserts: 1,
            replacements: 1,
        }
    }
}

impl Weights {
    pub fn is_unit(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of one metric.
///
/// Serializes with the derived `accuracy` and `error_rate` alongside the raw counts.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    pub metric: String,
    pub weights: Weights,
    pub weighted_errors: usize,
    pub reference_elements: usize,
    pub compared_elements: usize,
}

impl MetricResult {
    /// `weighted_errors / reference_elements`; `0` when both sides are empty and
    /// `f64::INFINITY` when only the reference is.
    pub fn error_rate(&self) -> f64 {
        if self.reference_elements == 0 && self.compared_elements == 0 {
            return 0.0;
        }
        if self.reference_elements == 0 {
            return f64::INFINITY;
        }
        self.weighted_errors as f64 / self.reference_elements as f64
    }

    pub fn accuracy(&self) -> f64 {
        1.0 - self.error_rate()
    }
}

impl Serialize for MetricResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MetricResult", 7)?;
        state.serialize_field("metric", &self.metric)?;
        state.serialize_field("weights", &self.weights)?;
        state.serialize_field("weighted_errors", &self.weighted_errors)?;
        state.serialize_field("reference_elements", &self.reference_elements)?;
        state.serialize_field("compared_elements", &self.compared_elements)?;
        state.serialize_field("accuracy", &self.accuracy())?;
        state.serialize_field("error_rate", &self.error_rate())?;
        state.end()
    }
}

fn rate(distance: usize, reference_len: usize) -> f64 {
    if distance == 0 {
        0.0
    } else if reference_len == 0 {
        f64::INFINITY
    } else {
        distance as f64 / reference_len as f64
    }
}

/// Character error rate and reference length in grapheme clusters.
pub fn character_error_rate_n(reference: &str, compared: &str) -> (f64, usize) {
    let reference = chars_normalized(reference);
    let compared = chars_normalized(compared);
    let d = levenshtein(&reference, &compared);
    (rate(d, reference.len()), reference.len())
}

pub fn character_error_rate(reference: &str, compared: &str) -> f64 {
    character_error_rate_n(reference, compared).0
}

/// Word error rate of two pre-split word sequences, and the reference length.
pub fn word_error_rate_n_seq<T: PartialEq>(reference: &[T], compared: &[T]) -> (f64, usize) {
    let d = levenshtein(reference, compared);
    (rate(d, reference.len()), reference.len())
}

/// Word error rate and reference length in words.
pub fn word_error_rate_n(reference: &str, compared: &str) -> (f64, usize) {
    word_error_rate_n_seq(&words_normalized(reference), &words_normalized(compared))
}

pub fn word_error_rate(reference: &str, compared: &str) -> f64 {
    word_error_rate_n(reference, compared).0
}

/// Weighted errors of the minimal unweighted edit script between two sequences.
fn weighted_edit_errors<T: PartialEq>(reference: &[T], compared: &[T], weights: &Weights) -> usize {
    let (inserts, deletes, replacements) = count_editops(&seq_editops(reference, compared));
    weights.inserts as usize * inserts + weights.deletes as usize * deletes + weights.replacements as usize * replacements
}

/// Character accuracy over grapheme clusters.
///
/// Weights are applied to the operations of the minimal unweighted edit script.
pub fn character_accuracy(reference: &str, compared: &str, weights: Weights) -> MetricResult {
    let reference = chars_normalized(reference);
    let compared = chars_normalized(compared);
    let weighted_errors = if weights.is_unit() {
        levenshtein(&reference, &compared)
    } else {
        weighted_edit_errors(&reference, &compared, &weights)
    };
    MetricResult {
        metric: "character_accuracy".to_string(),
        weights,
        weighted_errors,
        reference_elements: reference.len(),
        compared_elements: compared.len(),
    }
}

/// Word accuracy over normalized words.
///
/// # Errors
///
/// Returns `OcrEvalError::Validation` for non-unit weights, which are not supported
/// for words.
pub fn word_accuracy(reference: &str, compared: &str, weights: Weights) -> Result<MetricResult> {
    if !weights.is_unit() {
        return Err(OcrEvalError::validation(format!(
            "word accuracy does not support weights other than 1/1/1, got {}/{}/{}",
            weights.deletes, weights.inserts, weights.replacements
        )));
    }
    let reference = words_normalized(reference);
    let compared = words_normalized(compared);
    Ok(MetricResult {
        metric: "word_accuracy".to_string(),
        weights,
        weighted_errors: levenshtein(&reference, &compared),
        reference_elements: reference.len(),
        compared_elements: compared.len(),
    })
}

fn bag<T: Eq + Hash>(items: impl IntoIterator<Item = T>) -> AHashMap<T, usize> {
    let mut counts = AHashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Elements of `a` missing from `b`, counted with multiplicity.
fn bag_difference<T: Eq + Hash>(a: &AHashMap<T, usize>, b: &AHashMap<T, usize>) -> usize {
    a.iter()
        .map(|(item, count)| count.saturating_sub(b.get(item).copied().unwrap_or(0)))
        .sum()
}

/// Compare two multisets, ignoring order.
///
/// Reference elements missing from the compared bag are deletes, the converse are
/// inserts. When one replacement costs less than a delete plus an insert, pairs of
/// them are counted as replacements instead.
pub fn bag_accuracy<T: Eq + Hash>(
    reference: &AHashMap<T, usize>,
    compared: &AHashMap<T, usize>,
    weights: Weights,
    metric: &str,
) -> MetricResult {
    let mut deletes = bag_difference(reference, compared);
    let mut inserts = bag_difference(compared, reference);
    let mut replacements = 0;
    if weights.replacements < weights.deletes + weights.inserts {
        replacements = deletes.min(inserts);
        (deletes, inserts) = (deletes - replacements, inserts - replacements);
    }

    MetricResult {
        metric: metric.to_string(),
        weights,
        weighted_errors: weights.deletes as usize * deletes
            + weights.inserts as usize * inserts
            + weights.replacements as usize * replacements,
        reference_elements: reference.values().sum(),
        compared_elements: compared.values().sum(),
    }
}

pub fn bag_of_chars_accuracy(reference: &str, compared: &str, weights: Weights) -> MetricResult {
    bag_accuracy(
        &bag(chars_normalized(reference)),
        &bag(chars_normalized(compared)),
        weights,
        "bag_of_chars_accuracy",
    )
}

pub fn bag_of_words_accuracy(reference: &str, compared: &str, weights: Weights) -> MetricResult {
    bag_accuracy(
        &bag(words_normalized(reference)),
        &bag(words_normalized(compared)),
        weights,
        "bag_of_words_accuracy",
    )
}

/// Flexible character accuracy as a metric result.
///
/// `weighted_errors` is the aggregate error count of the best match set; element
/// counts are grapheme clusters without line breaks.
pub fn flexible_character_accuracy(engine: &FlexibleCharacterAccuracy, reference: &str, compared: &str) -> MetricResult {
    let result = engine.evaluate(reference, compared);
    let total = result.distance();
    MetricResult {
        metric: "flexible_character_accuracy".to_string(),
        weights: Weights::default(),
        weighted_errors: total.errors(),
        reference_elements: total.reference_len(),
        compared_elements: total.compared_len(),
    }
}
