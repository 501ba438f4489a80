//! Edit operation scripts recovered from the Levenshtein matrix.
//!
//! Among equal-cost scripts the backtrace always prefers, in this order:
//! delete, insert, replace, match. The order is fixed so results are reproducible.

use super::levenshtein::levenshtein_matrix;
use crate::error::{OcrEvalError, Result};
use crate::text::chars_normalized;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an edit operation, without its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Insert,
    Delete,
    Replace,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditKind::Insert => write!(f, "insert"),
            EditKind::Delete => write!(f, "delete"),
            EditKind::Replace => write!(f, "replace"),
        }
    }
}

/// A single edit operation.
///
/// `left` indexes the source sequence and `right` the target sequence. Indices are
/// only meaningful against the exact pair of sequences the script was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditOp {
    Insert { left: usize, right: usize },
    Delete { left: usize, right: usize },
    Replace { left: usize, right: usize },
}

impl EditOp {
    pub fn kind(&self) -> EditKind {
        match self {
            EditOp::Insert { .. } => EditKind::Insert,
            EditOp::Delete { .. } => EditKind::Delete,
            EditOp::Replace { .. } => EditKind::Replace,
        }
    }

    pub fn left(&self) -> usize {
        match *self {
            EditOp::Insert { left, .. } | EditOp::Delete { left, .. } | EditOp::Replace { left, .. } => left,
        }
    }

    pub fn right(&self) -> usize {
        match *self {
            EditOp::Insert { right, .. } | EditOp::Delete { right, .. } | EditOp::Replace { right, .. } => right,
        }
    }

    /// Whether the operation applies at left index `i` and right index `j`.
    #[inline]
    pub fn applies_at(&self, i: usize, j: usize) -> bool {
        self.left() == i && self.right() == j
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind(), self.left(), self.right())
    }
}

/// Minimal edit script turning `seq1` into `seq2`, ordered left to right.
pub fn seq_editops<T: PartialEq>(seq1: &[T], seq2: &[T]) -> Vec<EditOp> {
    let matrix = levenshtein_matrix(seq1, seq2);
    let mut ops = Vec::with_capacity(matrix.distance());
    let (mut i, mut j) = (seq1.len(), seq2.len());

    while i > 0 || j > 0 {
        let current = matrix.get(i, j);
        if i > 0 && matrix.get(i - 1, j) + 1 == current {
            ops.push(EditOp::Delete { left: i - 1, right: j });
            i -= 1;
        } else if j > 0 && matrix.get(i, j - 1) + 1 == current {
            ops.push(EditOp::Insert { left: i, right: j - 1 });
            j -= 1;
        } else if i > 0 && j > 0 && matrix.get(i - 1, j - 1) + 1 == current {
            ops.push(EditOp::Replace {
                left: i - 1,
                right: j - 1,
            });
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && matrix.get(i - 1, j - 1) == current {
            i -= 1;
            j -= 1;
        } else {
            // Unreachable for a well-formed matrix
            break;
        }
    }

    ops.reverse();
    ops
}

/// Edit script between two Unicode strings, indexed by grapheme cluster of their NFC forms.
pub fn editops(s1: &str, s2: &str) -> Vec<EditOp> {
    seq_editops(&chars_normalized(s1), &chars_normalized(s2))
}

/// Check that `ops` is a well-formed script for sequences of lengths `m` and `n`:
/// strictly advancing positions and every index in range.
pub fn validate_editops(ops: &[EditOp], m: usize, n: usize) -> Result<()> {
    let (mut i, mut j) = (0usize, 0usize);
    for op in ops {
        let (left, right) = (op.left(), op.right());
        if left < i || right < j || left - i != right - j {
            return Err(OcrEvalError::invalid_input(format!(
                "edit operation {} is out of order (expected position after ({}, {}))",
                op, i, j
            )));
        }
        let (next_i, next_j) = match op.kind() {
            EditKind::Insert => (left, right + 1),
            EditKind::Delete => (left + 1, right),
            EditKind::Replace => (left + 1, right + 1),
        };
        if next_i > m || next_j > n {
            return Err(OcrEvalError::invalid_input(format!(
                "edit operation {} is out of range for sequences of length {} and {}",
                op, m, n
            )));
        }
        i = next_i;
        j = next_j;
    }
    if m - i != n - j {
        return Err(OcrEvalError::invalid_input(format!(
            "edit script leaves unmatched tails of length {} and {}",
            m - i,
            n - j
        )));
    }
    Ok(())
}

/// Apply an edit script to `seq1`, taking inserted and replacing elements from `seq2`.
///
/// Positions without an operation copy the element from `seq1`. Applying
/// `seq_editops(seq1, seq2)` therefore reconstructs `seq2` exactly.
///
/// # Errors
///
/// Returns `OcrEvalError::InvalidInput` when `ops` is not a valid script for the inputs.
pub fn apply_editops<T: Clone>(seq1: &[T], seq2: &[T], ops: &[EditOp]) -> Result<Vec<T>> {
    validate_editops(ops, seq1.len(), seq2.len())?;

    let mut out = Vec::with_capacity(seq2.len());
    let mut i = 0usize;
    for op in ops {
        out.extend_from_slice(&seq1[i..op.left()]);
        i = op.left();
        match op.kind() {
            EditKind::Insert => out.push(seq2[op.right()].clone()),
            EditKind::Delete => i += 1,
            EditKind::Replace => {
                out.push(seq2[op.right()].clone());
                i += 1;
            }
        }
    }
    out.extend_from_slice(&seq1[i..]);
    Ok(out)
}

/// Count operations of each kind as `(inserts, deletes, replacements)`.
pub fn count_editops(ops: &[EditOp]) -> (usize, usize, usize) {
    ops.iter().fold((0, 0, 0), |(ins, del, rep), op| match op.kind() {
        EditKind::Insert => (ins + 1, del, rep),
        EditKind::Delete => (ins, del + 1, rep),
        EditKind::Replace => (ins, del, rep + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_editops_identical_is_empty() {
        assert!(seq_editops(&chars("Foo"), &chars("Foo")).is_empty());
        assert!(seq_editops::<char>(&[], &[]).is_empty());
    }

    #[test]
    fn test_editops_insert_at_end() {
        assert_eq!(
            seq_editops(&chars("Foo"), &chars("Food")),
            vec![EditOp::Insert { left: 3, right: 3 }]
        );
    }

    #[test]
    fn test_editops_delete_and_replace() {
        assert_eq!(
            seq_editops(&chars("Food"), &chars("Foo")),
            vec![EditOp::Delete { left: 3, right: 3 }]
        );
        assert_eq!(
            seq_editops(&chars("Fnord"), &chars("Food")),
            vec![
                EditOp::Replace { left: 1, right: 1 },
                EditOp::Delete { left: 3, right: 3 },
            ]
        );
    }

    #[test]
    fn test_editops_against_empty() {
        assert_eq!(
            seq_editops(&chars(""), &chars("ab")),
            vec![EditOp::Insert { left: 0, right: 0 }, EditOp::Insert { left: 0, right: 1 }]
        );
        assert_eq!(
            seq_editops(&chars("ab"), &chars("")),
            vec![EditOp::Delete { left: 0, right: 0 }, EditOp::Delete { left: 1, right: 0 }]
        );
    }

    #[test]
    fn test_editops_grapheme_clusters() {
        // Composed "ñ" vs "m" + COMBINING TILDE differ in exactly one cluster
        assert_eq!(
            editops("Schlyñ", "Schlym\u{0303}"),
            vec![EditOp::Replace { left: 5, right: 5 }]
        );
        // "o" + COMBINING LATIN SMALL LETTER E vs "ö"
        assert_eq!(editops("o\u{0364}de", "öde"), vec![EditOp::Replace { left: 0, right: 0 }]);
    }

    #[test]
    fn test_editops_canonically_equivalent_is_empty() {
        assert!(editops("n\u{0303}", "\u{00f1}").is_empty());
    }

    #[test]
    fn test_editops_length_equals_distance() {
        let a = chars("Dies ist eine Tst!");
        let b = chars("Dies ist ein Test.");
        assert_eq!(seq_editops(&a, &b).len(), super::super::levenshtein::levenshtein(&a, &b));
    }

    #[test]
    fn test_apply_editops_reconstructs_target() {
        let pairs = [("Fnord", "Food"), ("", "abc"), ("abc", ""), ("kitten", "sitting")];
        for (a, b) in pairs {
            let (a, b) = (chars(a), chars(b));
            let ops = seq_editops(&a, &b);
            assert_eq!(apply_editops(&a, &b, &ops).unwrap(), b);
        }
    }

    #[test]
    fn test_apply_editops_rejects_out_of_range_ops() {
        let ops = [EditOp::Replace { left: 5, right: 5 }];
        let err = apply_editops(&chars("ab"), &chars("ab"), &ops).unwrap_err();
        assert!(matches!(err, OcrEvalError::InvalidInput { .. }));
    }

    #[test]
    fn test_apply_editops_rejects_unordered_ops() {
        let ops = [EditOp::Delete { left: 1, right: 1 }, EditOp::Delete { left: 0, right: 1 }];
        assert!(apply_editops(&chars("ab"), &chars(""), &ops).is_err());
    }

    #[test]
    fn test_count_editops() {
        let ops = seq_editops(&chars("Fnord"), &chars("Food"));
        assert_eq!(count_editops(&ops), (0, 1, 1));
        assert_eq!(ops[0].kind(), EditKind::Replace);
    }

    #[test]
    fn test_editop_serializes_tagged() {
        let json = serde_json::to_string(&EditOp::Insert { left: 3, right: 3 }).unwrap();
        assert_eq!(json, r#"{"op":"insert","left":3,"right":3}"#);
        assert_eq!(EditOp::Replace { left: 1, right: 2 }.to_string(), "replace(1, 2)");
    }
}
