//! Wagner-Fischer dynamic programming over arbitrary sequences.
//!
//! The algorithms here only need `PartialEq` on the elements, so they work the same
//! on grapheme clusters, normalized words, or any other token type.

use crate::text::chars_normalized;

/// The full `(m+1) x (n+1)` Levenshtein matrix, stored row-major.
///
/// Cell `(i, j)` holds the edit distance between the first `i` elements of the left
/// sequence and the first `j` elements of the right sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevenshteinMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<usize>,
}

impl LevenshteinMatrix {
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    /// Length of the left sequence.
    pub fn left_len(&self) -> usize {
        self.rows - 1
    }

    /// Length of the right sequence.
    pub fn right_len(&self) -> usize {
        self.cols - 1
    }

    /// The edit distance, found in the bottom right cell.
    pub fn distance(&self) -> usize {
        self.get(self.rows - 1, self.cols - 1)
    }
}

/// Compute the Levenshtein matrix of two sequences.
pub fn levenshtein_matrix<T: PartialEq>(seq1: &[T], seq2: &[T]) -> LevenshteinMatrix {
    let rows = seq1.len() + 1;
    let cols = seq2.len() + 1;
    let mut cells = vec![0usize; rows * cols];

    for (j, cell) in cells.iter_mut().take(cols).enumerate() {
        *cell = j;
    }

    for (i, left) in seq1.iter().enumerate() {
        let (done, rest) = cells.split_at_mut((i + 1) * cols);
        let previous = &done[i * cols..];
        let current = &mut rest[..cols];
        current[0] = i + 1;
        for (j, right) in seq2.iter().enumerate() {
            let substitution = previous[j] + usize::from(left != right);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }
    }

    LevenshteinMatrix { rows, cols, cells }
}

/// Levenshtein distance between two sequences.
///
/// Only two rows are kept, so this is the cheap path when the edit script is not needed.
pub fn levenshtein<T: PartialEq>(seq1: &[T], seq2: &[T]) -> usize {
    if seq1.is_empty() {
        return seq2.len();
    }
    if seq2.is_empty() {
        return seq1.len();
    }

    let mut previous: Vec<usize> = (0..=seq2.len()).collect();
    let mut current = vec![0usize; seq2.len() + 1];

    for (i, left) in seq1.iter().enumerate() {
        current[0] = i + 1;
        for (j, right) in seq2.iter().enumerate() {
            let substitution = previous[j] + usize::from(left != right);
            current[j + 1] = substitution.min(current[j] + 1).min(previous[j + 1] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[seq2.len()]
}

/// Levenshtein distance divided by the length of the longer sequence.
///
/// Lies in `[0, 1]`; two empty sequences have a normalized distance of `0`.
pub fn normalized_levenshtein<T: PartialEq>(seq1: &[T], seq2: &[T]) -> f64 {
    let longest = seq1.len().max(seq2.len());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(seq1, seq2) as f64 / longest as f64
}

/// Levenshtein distance between two Unicode strings, counted in grapheme clusters
/// of their NFC normalizations.
pub fn distance(s1: &str, s2: &str) -> usize {
    levenshtein(&chars_normalized(s1), &chars_normalized(s2))
}

/// Grapheme-aware distance normalized by the longer string's cluster count.
pub fn normalized_distance(s1: &str, s2: &str) -> f64 {
    normalized_levenshtein(&chars_normalized(s1), &chars_normalized(s2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_levenshtein_basic() {
        assert_eq!(levenshtein(&chars("a"), &chars("a")), 0);
        assert_eq!(levenshtein(&chars("a"), &chars("b")), 1);
        assert_eq!(levenshtein(&chars("Foo"), &chars("Bar")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("")), 0);
        assert_eq!(levenshtein(&chars("Foo"), &chars("")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("Foo")), 3);
        assert_eq!(levenshtein(&chars("Foo"), &chars("Food")), 1);
        assert_eq!(levenshtein(&chars("Fnord"), &chars("Food")), 2);
        assert_eq!(levenshtein(&chars("Müll"), &chars("Mull")), 1);
        assert_eq!(levenshtein(&chars("Abstand"), &chars("Sand")), 4);
    }

    #[test]
    fn test_levenshtein_matches_matrix_distance() {
        let pairs = [("kitten", "sitting"), ("gumbo", "gambol"), ("", "abc"), ("flaw", "lawn")];
        for (a, b) in pairs {
            let matrix = levenshtein_matrix(&chars(a), &chars(b));
            assert_eq!(matrix.distance(), levenshtein(&chars(a), &chars(b)), "{a} vs {b}");
            assert_eq!(matrix.left_len(), a.len());
            assert_eq!(matrix.right_len(), b.len());
        }
    }

    #[test]
    fn test_levenshtein_matrix_borders() {
        let matrix = levenshtein_matrix(&chars("abc"), &chars("ab"));
        assert_eq!(matrix.get(0, 0), 0);
        assert_eq!(matrix.get(3, 0), 3);
        assert_eq!(matrix.get(0, 2), 2);
        assert_eq!(matrix.distance(), 1);
    }

    #[test]
    fn test_levenshtein_works_on_words() {
        let reference = ["Dies", "ist", "ein", "Beispielsatz"];
        let compared = ["Dies", "isi", "ein", "Beispielsatz", "!"];
        assert_eq!(levenshtein(&reference, &compared), 2);
    }

    #[test]
    fn test_normalized_levenshtein() {
        assert_eq!(normalized_levenshtein::<char>(&[], &[]), 0.0);
        assert_eq!(normalized_levenshtein(&chars("abcd"), &chars("abcd")), 0.0);
        assert_eq!(normalized_levenshtein(&chars("abcd"), &chars("ab")), 0.5);
        assert_eq!(normalized_levenshtein(&chars(""), &chars("xyz")), 1.0);
    }

    #[test]
    fn test_distance_unicode_normalization() {
        // Precomposed vs decomposed "ñ" is the same grapheme after NFC
        assert_eq!(distance("Schlyñ", "Schlyn\u{0303}"), 0);
        assert_eq!(distance("Schlyñ", "Schlym\u{0303}"), 1);
    }

    #[test]
    fn test_distance_counts_grapheme_clusters() {
        // "q" + COMBINING DOT BELOW has no precomposed form but is one cluster
        assert_eq!(distance("q\u{0323}", "q"), 1);
        assert_eq!(distance("q\u{0323}a", "a"), 1);
    }

    #[test]
    fn test_normalized_distance() {
        assert_eq!(normalized_distance("Fnord", "Food"), 2.0 / 5.0);
        assert_eq!(normalized_distance("", ""), 0.0);
    }
}
