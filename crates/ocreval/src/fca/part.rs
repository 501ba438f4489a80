//! Lines and line fragments used as the unit of matching.

use serde::{Serialize, Serializer};
use std::cmp::Reverse;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// A line of a text, or a fragment of one.
///
/// `start` and every length are counted in grapheme clusters. Two parts are equal when
/// their text, line and start are equal.
#[derive(Debug, Clone)]
pub struct Part {
    text: String,
    line: usize,
    start: usize,
    clusters: Arc<[String]>,
}

impl Part {
    pub fn new(text: impl Into<String>, line: usize, start: usize) -> Self {
        let text = text.into();
        let clusters: Arc<[String]> = text.graphemes(true).map(str::to_owned).collect();
        Self {
            text,
            line,
            start,
            clusters,
        }
    }

    /// An empty part anchored at `line`/`start`, the counterpart of unmatched text.
    pub fn empty(line: usize, start: usize) -> Self {
        Self {
            text: String::new(),
            line,
            start,
            clusters: Arc::from(Vec::new()),
        }
    }

    fn from_clusters(clusters: &[String], line: usize, start: usize) -> Self {
        Self {
            text: clusters.concat(),
            line,
            start,
            clusters: Arc::from(clusters),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.start + self.len()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn graphemes(&self) -> &[String] {
        &self.clusters
    }

    /// The fragment `[rel_start, rel_end)` relative to this part, clamped to its bounds.
    ///
    /// `None` for `rel_end` extends to the end of the part.
    pub fn substring(&self, rel_start: usize, rel_end: Option<usize>) -> Part {
        let len = self.len();
        let from = rel_start.min(len);
        let to = rel_end.unwrap_or(len).clamp(from, len);
        Part::from_clusters(&self.clusters[from..to], self.line, self.start + from)
    }

    /// What remains of this part after cutting out `other`: 0, 1 or 2 fragments.
    ///
    /// `"aaa bbb ccc"` split by `"bbb"` at offset 4 leaves `"aaa "` and `" ccc"`.
    pub fn split(&self, other: &Part) -> Vec<Part> {
        let mut rest = Vec::with_capacity(2);
        if self.start < other.start {
            rest.push(self.substring(0, Some(other.start - self.start)));
        }
        if other.end() < self.end() {
            rest.push(self.substring(other.end().saturating_sub(self.start), None));
        }
        rest
    }
}

impl PartialEq for Part {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.start == other.start && self.text == other.text
    }
}

impl Eq for Part {}

impl Hash for Part {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.line.hash(state);
        self.start.hash(state);
    }
}

impl Serialize for Part {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Part", 4)?;
        state.serialize_field("text", &self.text)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("length", &self.len())?;
        state.end()
    }
}

#[inline]
fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{1C}' | '\u{1D}' | '\u{1E}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` at line boundaries.
///
/// Recognizes `\n`, `\r`, `\r\n` and the Unicode line and paragraph separators. A
/// trailing boundary does not produce a final empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_boundary(c) {
            continue;
        }
        lines.push(&text[line_start..idx]);
        let mut next = idx + c.len_utf8();
        if c == '\r'
            && let Some(&(lf, '\n')) = chars.peek()
        {
            chars.next();
            next = lf + 1;
        }
        line_start = next;
    }

    if line_start < text.len() {
        lines.push(&text[line_start..]);
    }
    lines
}

/// Non-empty lines of `text` as parts, longest first.
///
/// Each part keeps the index of its line in `text`. Lines of equal length keep their
/// original order.
pub fn initialize_lines(text: &str) -> Vec<Part> {
    let mut lines: Vec<Part> = split_lines(text)
        .into_iter()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| Part::new(line, index, 0))
        .collect();
    sort_longest_first(&mut lines);
    lines
}

/// Stable sort by descending length.
pub(crate) fn sort_longest_first(lines: &mut [Part]) {
    lines.sort_by_key(|part| Reverse(part.len()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_length_counts_graphemes() {
        let part = Part::new("q\u{0323}ab", 0, 2);
        assert_eq!(part.len(), 3);
        assert_eq!(part.end(), 5);
    }

    #[test]
    fn test_part_equality_by_text_line_and_start() {
        assert_eq!(Part::new("abc", 1, 0), Part::new("abc", 1, 0));
        assert_ne!(Part::new("abc", 1, 0), Part::new("abc", 2, 0));
        assert_ne!(Part::new("abc", 1, 0), Part::new("abc", 1, 3));
    }

    #[test]
    fn test_substring() {
        let part = Part::new("abcdef", 1, 2);
        assert_eq!(part.substring(2, None), Part::new("cdef", 1, 4));
        assert_eq!(part.substring(0, Some(3)), Part::new("abc", 1, 2));
        assert_eq!(part.substring(2, Some(4)), Part::new("cd", 1, 4));
    }

    #[test]
    fn test_substring_clamps_out_of_range() {
        let part = Part::new("abc", 0, 0);
        assert_eq!(part.substring(1, Some(10)), Part::new("bc", 0, 1));
        assert!(part.substring(5, None).is_empty());
        assert!(part.substring(2, Some(1)).is_empty());
    }

    #[test]
    fn test_split_middle() {
        let line = Part::new("aaa bbb ccc", 0, 0);
        let rest = line.split(&Part::new("bbb", 0, 4));
        assert_eq!(rest, vec![Part::new("aaa ", 0, 0), Part::new(" ccc", 0, 7)]);
    }

    #[test]
    fn test_split_at_edges() {
        let line = Part::new("aaa bbb ccc", 0, 0);
        assert_eq!(line.split(&Part::new("aaa", 0, 0)), vec![Part::new(" bbb ccc", 0, 3)]);
        assert_eq!(line.split(&Part::new("ccc", 0, 8)), vec![Part::new("aaa bbb ", 0, 0)]);
        assert!(line.split(&line).is_empty());
    }

    #[test]
    fn test_split_of_offset_part() {
        let fragment = Part::new("bbb ccc", 0, 4);
        let rest = fragment.split(&Part::new("b c", 0, 6));
        assert_eq!(rest, vec![Part::new("bb", 0, 4), Part::new("cc", 0, 9)]);
    }

    #[test]
    fn test_split_lines_boundaries() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\u{2028}b\u{0C}c"), vec!["a", "b", "c"]);
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n"), vec![""]);
    }

    #[test]
    fn test_initialize_lines_sorted_longest_first() {
        let lines = initialize_lines("22\n1\n333");
        assert_eq!(
            lines,
            vec![Part::new("333", 2, 0), Part::new("22", 0, 0), Part::new("1", 1, 0)]
        );
    }

    #[test]
    fn test_initialize_lines_drops_empty_keeps_index() {
        let lines = initialize_lines("a\n\nbb\n");
        assert_eq!(lines, vec![Part::new("bb", 2, 0), Part::new("a", 0, 0)]);
    }

    #[test]
    fn test_initialize_lines_stable_for_equal_length() {
        let lines = initialize_lines("ab\ncd\nef");
        let order: Vec<usize> = lines.iter().map(Part::line).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_part_serializes_length() {
        let json = serde_json::to_value(Part::new("ab", 3, 1)).unwrap();
        assert_eq!(json["length"], 2);
        assert_eq!(json["line"], 3);
    }
}
