//! Matches between ground truth and OCR fragments, and how they are scored.

use super::coefficients::Coefficients;
use super::part::{Part, sort_longest_first};
use crate::distance::{EditOp, count_editops};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::sync::Arc;

/// Edit counts describing how a ground truth fragment turns into an OCR fragment.
///
/// `matches + replace + delete` is the ground truth length and
/// `matches + replace + insert` the OCR length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distance {
    #[serde(rename = "match")]
    pub matches: usize,
    pub replace: usize,
    pub delete: usize,
    pub insert: usize,
}

impl Distance {
    /// Count the operations of `ops`, a script computed against a reference of `reference_len` elements.
    pub fn from_editops(reference_len: usize, ops: &[EditOp]) -> Self {
        let (insert, delete, replace) = count_editops(ops);
        Self {
            matches: reference_len.saturating_sub(delete + replace),
            replace,
            delete,
            insert,
        }
    }

    pub fn errors(&self) -> usize {
        self.replace + self.delete + self.insert
    }

    pub fn reference_len(&self) -> usize {
        self.matches + self.replace + self.delete
    }

    pub fn compared_len(&self) -> usize {
        self.matches + self.replace + self.insert
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        Distance {
            matches: self.matches + rhs.matches,
            replace: self.replace + rhs.replace,
            delete: self.delete + rhs.delete,
            insert: self.insert + rhs.insert,
        }
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Distance) {
        *self = *self + rhs;
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Distance>>(iter: I) -> Self {
        iter.fold(Distance::default(), Add::add)
    }
}

impl<'a> Sum<&'a Distance> for Distance {
    fn sum<I: Iterator<Item = &'a Distance>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// A ground truth fragment paired with an OCR fragment.
///
/// Either side may be empty: unmatched ground truth is a match against an empty OCR
/// part (only deletes), unmatched OCR a match against an empty ground truth part
/// (only inserts).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub gt: Part,
    pub ocr: Part,
    pub dist: Distance,
    pub ops: Arc<[EditOp]>,
}

/// Character accuracy `1 - errors / characters` for one set of edit counts.
///
/// Errors are replacements, deletes and inserts; characters are the ground truth
/// length. Two empty texts score `1`. Errors beyond the reference length turn the
/// accuracy negative, and errors against an empty reference give negative infinity.
pub fn character_accuracy(dist: &Distance) -> f64 {
    let errors = dist.errors();
    let chars = dist.reference_len();
    if chars == 0 && errors == 0 {
        return 1.0;
    }
    1.0 - errors as f64 / chars as f64
}

/// Character accuracy of a whole text represented by its matches.
pub fn character_accuracy_for_matches(matches: &[Match]) -> f64 {
    let total: Distance = matches.iter().map(|m| &m.dist).sum();
    character_accuracy(&total)
}

/// Local alignment score of a match: `delete + insert + 2 * replace`.
pub fn score_edit_distance(m: &Match) -> usize {
    m.dist.delete + m.dist.insert + 2 * m.dist.replace
}

/// Penalty of pairing the lines `gt` and `ocr` through their local match `m`. Lower is better.
///
/// The offset term is zero unless the lines differ in length by more than one, and is
/// largest when the matched substring sits in the middle of the longer line.
pub fn calculate_penalty(gt: &Part, ocr: &Part, m: &Match, coef: &Coefficients) -> f64 {
    let min_edit_dist = score_edit_distance(m) as f64;
    let length_diff = gt.len().abs_diff(ocr.len()) as f64;
    let substring_length = gt.len().min(ocr.len()) as f64;

    let mut offset = 0.0;
    if length_diff > 1.0 {
        let gt_pos = m.gt.start().saturating_sub(gt.start());
        let ocr_pos = m.ocr.start().saturating_sub(ocr.start());
        let substring_pos = gt_pos.max(ocr_pos) as f64;
        offset = length_diff / 2.0 - (substring_pos - length_diff / 2.0).abs();
    }

    min_edit_dist * f64::from(coef.edit_dist) + length_diff * f64::from(coef.length_diff) + offset * f64::from(coef.offset)
        - substring_length * f64::from(coef.length)
}

/// Take `original` out of `lines`, putting back whatever `matched` did not cover.
///
/// Returns `true` if `original` was only partly consumed and split. The pool stays
/// sorted longest first.
pub fn remove_or_split(original: &Part, matched: &Part, lines: &mut Vec<Part>) -> bool {
    if let Some(pos) = lines.iter().position(|line| line == original) {
        lines.remove(pos);
    }
    if matched.len() < original.len() {
        lines.extend(original.split(matched));
        sort_longest_first(lines);
        return true;
    }
    false
}

/// Flatten matches back into two aligned texts, ground truth and OCR.
///
/// Matches are ordered by their ground truth position and a line break is emitted
/// whenever the ground truth line changes.
pub fn combine_lines(matches: &[Match]) -> (String, String) {
    let mut ordered: Vec<&Match> = matches.iter().collect();
    ordered.sort_by_key(|m| (m.gt.line(), m.gt.start()));

    let mut gt = String::new();
    let mut ocr = String::new();
    let mut current_line = None;
    for m in ordered {
        if current_line.is_some_and(|line| line != m.gt.line()) {
            gt.push('\n');
            ocr.push('\n');
        }
        current_line = Some(m.gt.line());
        gt.push_str(m.gt.text());
        ocr.push_str(m.ocr.text());
    }
    (gt, ocr)
}
