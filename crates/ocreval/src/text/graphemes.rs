//! Grapheme cluster adapters.
//!
//! Every character-level comparison in this crate operates on extended grapheme
//! clusters of NFC-normalized text, so that a base letter plus combining marks counts
//! as one character no matter how it was encoded.

use crate::error::{OcrEvalError, Result};
use std::borrow::Cow;
use unicode_normalization::{UnicodeNormalization, is_nfc};
use unicode_segmentation::UnicodeSegmentation;

/// NFC-normalize `text`, borrowing when it is already normalized.
pub fn normalize_nfc(text: &str) -> Cow<'_, str> {
    if is_nfc(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.nfc().collect())
    }
}

/// Split NFC-normalized text into owned grapheme clusters.
pub fn chars_normalized(text: &str) -> Vec<String> {
    normalize_nfc(text).graphemes(true).map(str::to_owned).collect()
}

/// An immutable, NFC-validated sequence of grapheme clusters.
///
/// Construction is the only place validation happens. Once built, the sequence can
/// be handed to the edit distance engine or the aligner without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphemeSequence {
    text: String,
    clusters: Vec<String>,
}

impl GraphemeSequence {
    /// Build a sequence from text that must already be NFC-normalized.
    ///
    /// # Errors
    ///
    /// Returns `OcrEvalError::InvalidInput` when `text` is not in NFC.
    pub fn from_nfc(text: &str) -> Result<Self> {
        if !is_nfc(text) {
            return Err(OcrEvalError::invalid_input(format!(
                "text is not NFC normalized: {:?}",
                truncate_for_message(text)
            )));
        }
        Ok(Self::from_normalized(text.to_string()))
    }

    /// Normalize `text` to NFC and build a sequence from it.
    pub fn normalize(text: &str) -> Self {
        Self::from_normalized(normalize_nfc(text).into_owned())
    }

    fn from_normalized(text: String) -> Self {
        let clusters = text.graphemes(true).map(str::to_owned).collect();
        Self { text, clusters }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.clusters
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

impl AsRef<[String]> for GraphemeSequence {
    fn as_ref(&self) -> &[String] {
        self.as_slice()
    }
}

fn truncate_for_message(text: &str) -> String {
    const MAX_GRAPHEMES: usize = 32;
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(MAX_GRAPHEMES).collect();
    if graphemes.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
