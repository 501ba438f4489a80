//! Result types handed to report renderers.

use crate::cache::CacheStats;
use crate::fca::{Coefficients, Distance, Match, combine_lines};
use crate::metrics::MetricResult;
use indexmap::IndexMap;
use serde::Serialize;

/// Best match set found by the flexible character accuracy search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FcaResult {
    pub score: f64,
    pub matches: Vec<Match>,
    /// Grid point that produced `matches`.
    pub coefficients: Coefficients,
}

impl FcaResult {
    /// Edit counts summed over all matches.
    pub fn distance(&self) -> Distance {
        self.matches.iter().map(|m| &m.dist).sum()
    }

    /// Ground truth and OCR text rebuilt from the matches, aligned line by line.
    pub fn aligned_texts(&self) -> (String, String) {
        combine_lines(&self.matches)
    }
}

/// Occupancy of the two memo caches of a flexible character accuracy engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FcaCacheStats {
    pub edit_ops: CacheStats,
    pub local_matches: CacheStats,
}

/// All metrics computed for one document pair, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<String>,
    #[serde(flatten)]
    pub metrics: IndexMap<String, MetricResult>,
}

impl EvaluationReport {
    pub fn get(&self, metric: &str) -> Option<&MetricResult> {
        self.metrics.get(metric)
    }
}
