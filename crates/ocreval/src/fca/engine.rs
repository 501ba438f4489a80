use super::coefficients::{CoefficientGrid, Coefficients};
use super::matching::{
    Distance, Match, calculate_penalty, character_accuracy, character_accuracy_for_matches, remove_or_split,
    score_edit_distance,
};
use super::part::{Part, initialize_lines};
use crate::cache::{DEFAULT_CACHE_CAPACITY, MemoCache};
use crate::core::config::FcaConfig;
use crate::distance::EditDistanceEngine;
use crate::error::{OcrEvalError, Result};
use crate::text::normalize_nfc;
use crate::types::{FcaCacheStats, FcaResult};
use std::num::NonZeroUsize;
use std::sync::Arc;

type PartPair = (Part, Part);

/// Flexible character accuracy engine.
///
/// Searches a grid of penalty coefficients; for every point it greedily pairs the
/// longest ground truth lines with their best OCR counterparts, splitting lines that
/// are only partly matched, and scores the resulting cover of both texts. The best
/// cover wins. A perfect score ends the search early.
///
/// Local alignments of line pairs are memoized, so the engine should be reused for
/// the grid of one document pair and [cleared](Self::clear_cache) between documents.
///
/// # Example
///
/// ```rust
/// use ocreval::fca::FlexibleCharacterAccuracy;
///
/// let engine = FlexibleCharacterAccuracy::default();
/// let result = engine.evaluate("aaa\nbbb\nccc", "ccc\naaa\nbbb");
/// assert_eq!(result.score, 1.0);
/// ```
#[derive(Debug)]
pub struct FlexibleCharacterAccuracy {
    grid: CoefficientGrid,
    parallel: bool,
    edits: EditDistanceEngine<String>,
    local_matches: MemoCache<PartPair, Option<Arc<Match>>>,
}

impl Default for FlexibleCharacterAccuracy {
    fn default() -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self::build(CoefficientGrid::default(), false, capacity)
    }
}

impl FlexibleCharacterAccuracy {
    fn build(grid: CoefficientGrid, parallel: bool, capacity: NonZeroUsize) -> Self {
        Self {
            grid,
            parallel,
            edits: EditDistanceEngine::with_capacity(capacity),
            local_matches: MemoCache::new(capacity),
        }
    }

    /// Build an engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns `OcrEvalError::Validation` for an empty or zero-step grid or a zero
    /// cache capacity.
    pub fn from_config(config: &FcaConfig) -> Result<Self> {
        config.grid.validate()?;
        let capacity = NonZeroUsize::new(config.cache_capacity)
            .ok_or_else(|| OcrEvalError::validation("cache_capacity must be positive"))?;
        Ok(Self::build(config.grid, config.parallel, capacity))
    }

    /// Replace the searched grid.
    ///
    /// # Errors
    ///
    /// Returns `OcrEvalError::Validation` if the grid is empty or has a zero step.
    pub fn with_grid(mut self, grid: CoefficientGrid) -> Result<Self> {
        grid.validate()?;
        self.grid = grid;
        Ok(self)
    }

    /// Evaluate the grid on a rayon thread pool. Ignored without the `parallel` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn grid(&self) -> &CoefficientGrid {
        &self.grid
    }

    /// Score `ocr` against the ground truth `gt`.
    ///
    /// Both texts are NFC-normalized and split into lines. Empty inputs are valid: an
    /// empty OCR text scores `0`, OCR text against an empty ground truth scores
    /// negative infinity, and two empty texts score `1`.
    pub fn evaluate(&self, gt: &str, ocr: &str) -> FcaResult {
        let gt_lines = initialize_lines(&normalize_nfc(gt));
        let ocr_lines = initialize_lines(&normalize_nfc(ocr));
        tracing::debug!(
            "Flexible character accuracy: {} ground truth lines, {} OCR lines, {} coefficient sets",
            gt_lines.len(),
            ocr_lines.len(),
            self.grid.len()
        );

        let result = if self.parallel {
            self.search_parallel(&gt_lines, &ocr_lines)
        } else {
            self.search_sequential(&gt_lines, &ocr_lines)
        };

        let result = result.unwrap_or_else(|| {
            let coefficients = Coefficients::default();
            let matches = self.match_parts(&gt_lines, &ocr_lines, &coefficients);
            FcaResult {
                score: character_accuracy_for_matches(&matches),
                matches,
                coefficients,
            }
        });

        tracing::debug!(
            "Best score {:.4} with {:?} ({} matches)",
            result.score,
            result.coefficients,
            result.matches.len()
        );
        result
    }

    fn search_sequential(&self, gt_lines: &[Part], ocr_lines: &[Part]) -> Option<FcaResult> {
        let mut best: Option<FcaResult> = None;
        for coefficients in self.grid.iter() {
            let matches = self.match_parts(gt_lines, ocr_lines, &coefficients);
            let score = character_accuracy_for_matches(&matches);
            tracing::trace!("Coefficients {:?} score {:.4}", coefficients, score);

            if best.as_ref().is_none_or(|current| score > current.score) {
                best = Some(FcaResult {
                    score,
                    matches,
                    coefficients,
                });
            }
            if score >= 1.0 {
                tracing::debug!("Perfect score reached, stopping grid search early");
                break;
            }
        }
        best
    }

    #[cfg(feature = "parallel")]
    fn search_parallel(&self, gt_lines: &[Part], ocr_lines: &[Part]) -> Option<FcaResult> {
        use rayon::prelude::*;

        let points: Vec<Coefficients> = self.grid.iter().collect();
        points
            .par_iter()
            .enumerate()
            .map(|(index, coefficients)| {
                let matches = self.match_parts(gt_lines, ocr_lines, coefficients);
                let score = character_accuracy_for_matches(&matches);
                (
                    index,
                    FcaResult {
                        score,
                        matches,
                        coefficients: *coefficients,
                    },
                )
            })
            .reduce_with(|a, b| {
                // Highest score wins; on ties the earlier grid point, as in the sequential search
                if b.1.score > a.1.score || (b.1.score == a.1.score && b.0 < a.0) {
                    b
                } else {
                    a
                }
            })
            .map(|(_, result)| result)
    }

    #[cfg(not(feature = "parallel"))]
    fn search_parallel(&self, gt_lines: &[Part], ocr_lines: &[Part]) -> Option<FcaResult> {
        self.search_sequential(gt_lines, ocr_lines)
    }

    /// Match two texts under one fixed set of coefficients.
    pub fn match_with_coefficients(&self, gt: &str, ocr: &str, coefficients: &Coefficients) -> Vec<Match> {
        let gt_lines = initialize_lines(&normalize_nfc(gt));
        let ocr_lines = initialize_lines(&normalize_nfc(ocr));
        self.match_parts(&gt_lines, &ocr_lines, coefficients)
    }

    fn match_parts(&self, gt_lines: &[Part], ocr_lines: &[Part], coefficients: &Coefficients) -> Vec<Match> {
        let mut gt_lines = gt_lines.to_vec();
        let mut ocr_lines = ocr_lines.to_vec();
        let mut matches = Vec::new();

        while !gt_lines.is_empty() && !ocr_lines.is_empty() {
            match self.match_longest_gt_lines(&mut gt_lines, &mut ocr_lines, coefficients) {
                Some(m) => matches.push(m),
                None => break,
            }
        }

        // Whatever is left on either side is deleted or inserted as a whole
        let deletes = gt_lines
            .iter()
            .map(|line| self.distance(line, &Part::empty(line.line(), line.start())));
        let inserts = ocr_lines
            .iter()
            .map(|line| self.distance(&Part::empty(line.line(), line.start()), line));
        matches.extend(deletes);
        matches.extend(inserts);
        matches
    }

    /// Match the longest remaining ground truth line(s) and update both pools.
    ///
    /// Every ground truth line tied for the maximum length is tried against all OCR
    /// lines; the pair with the best character accuracy is kept. Both lines are then
    /// removed from their pools, or replaced by their unmatched remainders.
    pub fn match_longest_gt_lines(
        &self,
        gt_lines: &mut Vec<Part>,
        ocr_lines: &mut Vec<Part>,
        coefficients: &Coefficients,
    ) -> Option<Match> {
        let longest = gt_lines.first()?.len();
        let mut best: Option<(f64, Arc<Match>, Part, Part)> = None;

        for gt_line in gt_lines.iter().take_while(|line| line.len() >= longest) {
            let Some((m, ocr_line)) = self.match_gt_line(gt_line, ocr_lines, coefficients) else {
                continue;
            };
            let score = character_accuracy(&m.dist);
            if best.as_ref().is_none_or(|(best_score, ..)| score > *best_score) {
                best = Some((score, m, gt_line.clone(), ocr_line.clone()));
            }
        }

        let (_, m, gt_line, ocr_line) = best?;
        remove_or_split(&gt_line, &m.gt, gt_lines);
        remove_or_split(&ocr_line, &m.ocr, ocr_lines);
        Some(Match::clone(&m))
    }

    /// The OCR line with the lowest penalty against `gt_line`, with its local match.
    pub fn match_gt_line<'a>(
        &self,
        gt_line: &Part,
        ocr_lines: &'a [Part],
        coefficients: &Coefficients,
    ) -> Option<(Arc<Match>, &'a Part)> {
        let mut best: Option<(f64, Arc<Match>, &'a Part)> = None;
        for ocr_line in ocr_lines {
            let Some(m) = self.match_lines(gt_line, ocr_line) else {
                continue;
            };
            let penalty = calculate_penalty(gt_line, ocr_line, &m, coefficients);
            if best.as_ref().is_none_or(|(min_penalty, ..)| penalty < *min_penalty) {
                best = Some((penalty, m, ocr_line));
            }
        }
        best.map(|(_, m, ocr_line)| (m, ocr_line))
    }

    /// Best local alignment of two lines, memoized per line pair.
    ///
    /// The shorter line slides along the longer one; at each offset the equally long
    /// windows are compared and the offset with the lowest
    /// [edit score](score_edit_distance) wins. `None` if either line is empty.
    pub fn match_lines(&self, gt_line: &Part, ocr_line: &Part) -> Option<Arc<Match>> {
        let key = (gt_line.clone(), ocr_line.clone());
        self.local_matches
            .get_or_insert_with(key, || self.compute_local_match(gt_line, ocr_line))
    }

    fn compute_local_match(&self, gt_line: &Part, ocr_line: &Part) -> Option<Arc<Match>> {
        let window = gt_line.len().min(ocr_line.len());
        if window == 0 {
            return None;
        }

        let mut best: Option<(usize, Match)> = None;
        for i in 0..=gt_line.len() - window {
            let gt_window = gt_line.substring(i, Some(i + window));
            for j in 0..=ocr_line.len() - window {
                let m = self.distance(&gt_window, &ocr_line.substring(j, Some(j + window)));
                let score = score_edit_distance(&m);
                if best.as_ref().is_none_or(|(min_score, _)| score < *min_score) {
                    best = Some((score, m));
                }
            }
        }
        best.map(|(_, m)| Arc::new(m))
    }

    /// Edit distance between two parts as a [`Match`].
    pub fn distance(&self, gt: &Part, ocr: &Part) -> Match {
        let ops = self.edits.editops(gt.graphemes(), ocr.graphemes());
        Match {
            gt: gt.clone(),
            ocr: ocr.clone(),
            dist: Distance::from_editops(gt.len(), &ops),
            ops,
        }
    }

    /// Drop all memoized results. Call between independent document pairs, never while
    /// an evaluation on this engine is running.
    pub fn clear_cache(&self) {
        self.edits.clear();
        self.local_matches.clear();
    }

    pub fn cache_stats(&self) -> FcaCacheStats {
        FcaCacheStats {
            edit_ops: self.edits.cache_stats(),
            local_matches: self.local_matches.stats(),
        }
    }
}

/// Flexible character accuracy of `ocr` against `gt` with the default grid.
///
/// Builds a fresh engine, so no cached state outlives the call.
pub fn flexible_character_accuracy(gt: &str, ocr: &str) -> FcaResult {
    FlexibleCharacterAccuracy::default().evaluate(gt, ocr)
}
