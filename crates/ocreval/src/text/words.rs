//! Word segmentation for word-level metrics.
//!
//! Words follow the Unicode word boundary rules (UAX #29). Segments consisting only
//! of whitespace, punctuation, symbols, marks or control characters are not words.

use super::graphemes::normalize_nfc;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into words.
///
/// `private_use_as_letter` makes Private Use Area code points (U+E000..=U+F8FF) behave
/// like letters, so they join the word they are attached to instead of forming
/// boundaries, including across an apostrophe or other mid-word punctuation
/// (`a'` + glyph stays one word, as `a'b` does). Transcriptions of historical prints
/// use that range for special glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSegmenter {
    pub private_use_as_letter: bool,
}

impl Default for WordSegmenter {
    fn default() -> Self {
        Self {
            private_use_as_letter: true,
        }
    }
}

impl WordSegmenter {
    pub fn new(private_use_as_letter: bool) -> Self {
        Self { private_use_as_letter }
    }

    /// Words of `text`, in order, borrowed from the input.
    pub fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let segments: Vec<(usize, &str)> = text.split_word_bound_indices().collect();
        let mut words = Vec::new();
        let mut pending: Option<(usize, usize)> = None;
        let mut i = 0;

        while let Some(&(start, segment)) = segments.get(i) {
            let end = start + segment.len();
            pending = match pending {
                Some((open, close)) if self.private_use_as_letter => {
                    let previous = &text[open..close];
                    if joins_private_use(previous, segment) {
                        Some((open, end))
                    } else if let Some(&(next_start, next)) = segments.get(i + 1)
                        && is_mid_letter(segment)
                        && joins_private_use_across_mid(previous, next)
                    {
                        i += 1;
                        Some((open, next_start + next.len()))
                    } else {
                        push_if_word(&mut words, previous);
                        Some((start, end))
                    }
                }
                Some((open, close)) => {
                    push_if_word(&mut words, &text[open..close]);
                    Some((start, end))
                }
                None => Some((start, end)),
            };
            i += 1;
        }

        if let Some((open, close)) = pending {
            push_if_word(&mut words, &text[open..close]);
        }

        words
    }

    /// Words of the NFC-normalized `text`.
    pub fn words_normalized(&self, text: &str) -> Vec<String> {
        self.words(&normalize_nfc(text)).into_iter().map(str::to_owned).collect()
    }
}

/// Words of the NFC-normalized `text` using the default segmenter.
pub fn words_normalized(text: &str) -> Vec<String> {
    WordSegmenter::default().words_normalized(text)
}

#[inline]
fn is_private_use(c: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&c)
}

#[inline]
fn is_letter_like(c: char) -> bool {
    c.is_alphanumeric() || is_private_use(c)
}

fn joins_private_use(previous: &str, next: &str) -> bool {
    let (Some(last), Some(first)) = (previous.chars().next_back(), next.chars().next()) else {
        return false;
    };
    (is_private_use(last) || is_private_use(first)) && is_letter_like(last) && is_letter_like(first)
}

/// Apostrophes and the other MidLetter / MidNumLet characters of UAX #29.
fn is_mid_letter(segment: &str) -> bool {
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => matches!(
            c,
            '\'' | '.'
                | ':'
                | '\u{B7}'
                | '\u{387}'
                | '\u{55F}'
                | '\u{5F4}'
                | '\u{2018}'
                | '\u{2019}'
                | '\u{2024}'
                | '\u{2027}'
                | '\u{FE13}'
                | '\u{FE52}'
                | '\u{FE55}'
                | '\u{FF07}'
                | '\u{FF0E}'
                | '\u{FF1A}'
        ),
        _ => false,
    }
}

/// Letters on both sides of a mid-word character, at least one of them private use.
fn joins_private_use_across_mid(previous: &str, next: &str) -> bool {
    let (Some(last), Some(first)) = (previous.chars().next_back(), next.chars().next()) else {
        return false;
    };
    let is_letter = |c: char| c.is_alphabetic() || is_private_use(c);
    (is_private_use(last) || is_private_use(first)) && is_letter(last) && is_letter(first)
}

fn push_if_word<'a>(words: &mut Vec<&'a str>, segment: &'a str) {
    if segment.chars().any(is_letter_like) {
        words.push(segment);
    }
}
