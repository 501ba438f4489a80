//! Runs the configured metrics over one document pair.

use super::config::{EvaluationConfig, Metric};
use crate::error::Result;
use crate::fca::FlexibleCharacterAccuracy;
use crate::metrics::{self, MetricResult};
use crate::types::EvaluationReport;

/// Evaluates document pairs with a fixed configuration.
///
/// Holds a flexible character accuracy engine whose caches are cleared after every
/// document pair, so one evaluator can be reused across a batch.
#[derive(Debug)]
pub struct Evaluator {
    config: EvaluationConfig,
    fca: FlexibleCharacterAccuracy,
}

impl Evaluator {
    /// # Errors
    ///
    /// Returns `OcrEvalError::Validation` if the configuration is invalid.
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        let fca = FlexibleCharacterAccuracy::from_config(&config.fca)?;
        Ok(Self { config, fca })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Compute every configured metric of `ocr` against the ground truth `gt`.
    pub fn evaluate(&self, gt: &str, ocr: &str) -> Result<EvaluationReport> {
        let mut report = EvaluationReport::default();
        for metric in &self.config.metrics {
            let result = self.run_metric(*metric, gt, ocr)?;
            tracing::debug!("{}: accuracy {:.4}", metric, result.accuracy());
            report.metrics.insert(metric.to_string(), result);
        }
        self.fca.clear_cache();
        Ok(report)
    }

    fn run_metric(&self, metric: Metric, gt: &str, ocr: &str) -> Result<MetricResult> {
        let weights = self.config.weights;
        Ok(match metric {
            Metric::Cer => metrics::character_accuracy(gt, ocr, weights),
            Metric::Wer => metrics::word_accuracy(gt, ocr, weights)?,
            Metric::Boc => metrics::bag_of_chars_accuracy(gt, ocr, weights),
            Metric::Bow => metrics::bag_of_words_accuracy(gt, ocr, weights),
            Metric::Fca => metrics::flexible_character_accuracy(&self.fca, gt, ocr),
        })
    }
}

/// Evaluate one document pair with `config`.
pub fn evaluate(gt: &str, ocr: &str, config: &EvaluationConfig) -> Result<EvaluationReport> {
    Evaluator::new(config.clone())?.evaluate(gt, ocr)
}
