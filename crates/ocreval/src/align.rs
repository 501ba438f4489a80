//! Pairwise alignment of two sequences for diff rendering.
//!
//! An alignment walks both sequences once, left to right, and yields one pair per
//! step: both elements for a match or replacement, a gap (`None`) on one side for an
//! insertion or deletion.

use crate::distance::{EditKind, EditOp, seq_editops, validate_editops};
use crate::error::{OcrEvalError, Result};
use crate::text::chars_normalized;
use std::iter::FusedIterator;

/// One step of an alignment.
pub type AlignmentPair<'a, T> = (Option<&'a T>, Option<&'a T>);

/// Lazy iterator over the aligned pairs of two sequences.
///
/// Created by [`seq_align`] or [`seq_align_with`].
#[derive(Debug, Clone)]
pub struct Alignment<'a, T> {
    left: &'a [T],
    right: &'a [T],
    ops: std::vec::IntoIter<EditOp>,
    pending: Option<EditOp>,
    i: usize,
    j: usize,
}

impl<'a, T> Alignment<'a, T> {
    fn new(left: &'a [T], right: &'a [T], ops: Vec<EditOp>) -> Self {
        let mut ops = ops.into_iter();
        let pending = ops.next();
        Self {
            left,
            right,
            ops,
            pending,
            i: 0,
            j: 0,
        }
    }
}

impl<'a, T> Iterator for Alignment<'a, T> {
    type Item = AlignmentPair<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.left.len() && self.j >= self.right.len() {
            return None;
        }

        let op = match self.pending {
            Some(op) if op.applies_at(self.i, self.j) => {
                self.pending = self.ops.next();
                Some(op.kind())
            }
            _ => None,
        };

        let pair = match op {
            Some(EditKind::Insert) => {
                let pair = (None, self.right.get(self.j));
                self.j += 1;
                pair
            }
            Some(EditKind::Delete) => {
                let pair = (self.left.get(self.i), None);
                self.i += 1;
                pair
            }
            Some(EditKind::Replace) | None => {
                let pair = (self.left.get(self.i), self.right.get(self.j));
                self.i += 1;
                self.j += 1;
                pair
            }
        };
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.left.len().saturating_sub(self.i);
        let right = self.right.len().saturating_sub(self.j);
        (left.max(right), Some(left + right))
    }
}

impl<T> FusedIterator for Alignment<'_, T> {}

/// Align two sequences, computing the edit script first.
pub fn seq_align<'a, T: PartialEq>(seq1: &'a [T], seq2: &'a [T]) -> Alignment<'a, T> {
    let ops = seq_editops(seq1, seq2);
    Alignment::new(seq1, seq2, ops)
}

/// Align two sequences along a precomputed edit script.
///
/// # Errors
///
/// Returns `OcrEvalError::InvalidInput` if `ops` is not a valid script for the two
/// sequences, e.g. when it was computed for different inputs.
pub fn seq_align_with<'a, T>(seq1: &'a [T], seq2: &'a [T], ops: &[EditOp]) -> Result<Alignment<'a, T>> {
    validate_editops(ops, seq1.len(), seq2.len())?;
    Ok(Alignment::new(seq1, seq2, ops.to_vec()))
}

/// Align two Unicode strings by grapheme cluster, returning owned clusters.
pub fn align(s1: &str, s2: &str) -> Vec<(Option<String>, Option<String>)> {
    let left = chars_normalized(s1);
    let right = chars_normalized(s2);
    seq_align(&left, &right)
        .map(|(l, r)| (l.cloned(), r.cloned()))
        .collect()
}

/// Align corresponding lines, each along its own precomputed edit script.
///
/// Used when a line-level correspondence is already known and character-level detail
/// is wanted inside each line pair. Line `k` of the output is the alignment of
/// `lines1[k]` with `lines2[k]` along `ops[k]`.
///
/// # Errors
///
/// Returns `OcrEvalError::InvalidInput` when the three lists differ in length or any
/// script does not fit its line pair.
pub fn align_lines<'a, T, L>(lines1: &'a [L], lines2: &'a [L], ops: &[Vec<EditOp>]) -> Result<Vec<Alignment<'a, T>>>
where
    L: AsRef<[T]>,
{
    if lines1.len() != lines2.len() || lines1.len() != ops.len() {
        return Err(OcrEvalError::invalid_input(format!(
            "line-wise alignment needs equally many lines and scripts, got {}, {} and {}",
            lines1.len(),
            lines2.len(),
            ops.len()
        )));
    }

    lines1
        .iter()
        .zip(lines2)
        .zip(ops)
        .map(|((left, right), line_ops)| seq_align_with(left.as_ref(), right.as_ref(), line_ops))
        .collect()
}
