//! Evaluation configuration.
//!
//! Configuration can be built in code, loaded from TOML, YAML or JSON, or discovered
//! as an `ocreval.toml` in the current directory or one of its parents.

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::{OcrEvalError, Result};
use crate::fca::CoefficientGrid;
use crate::metrics::Weights;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// File name looked for by [`EvaluationConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "ocreval.toml";

/// A metric that can be requested in a configuration or on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Character accuracy / character error rate
    #[serde(alias = "ca", alias = "character_accuracy")]
    Cer,
    /// Word accuracy / word error rate
    #[serde(alias = "wa", alias = "word_accuracy")]
    Wer,
    #[serde(alias = "bag_of_chars_accuracy")]
    Boc,
    #[serde(alias = "bag_of_words_accuracy")]
    Bow,
    #[serde(alias = "flexible_character_accuracy")]
    Fca,
}

impl Metric {
    pub const ALL: [Metric; 5] = [Metric::Cer, Metric::Wer, Metric::Boc, Metric::Bow, Metric::Fca];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cer => "cer",
            Metric::Wer => "wer",
            Metric::Boc => "boc",
            Metric::Bow => "bow",
            Metric::Fca => "fca",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = OcrEvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cer" | "ca" | "character_accuracy" => Ok(Metric::Cer),
            "wer" | "wa" | "word_accuracy" => Ok(Metric::Wer),
            "boc" | "bag_of_chars_accuracy" => Ok(Metric::Boc),
            "bow" | "bag_of_words_accuracy" => Ok(Metric::Bow),
            "fca" | "flexible_character_accuracy" => Ok(Metric::Fca),
            other => Err(OcrEvalError::UnsupportedMetric(other.to_string())),
        }
    }
}

/// Parse a comma separated metric list such as `"cer,wer,fca"`.
pub fn parse_metrics(list: &str) -> Result<Vec<Metric>> {
    list.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(Metric::from_str)
        .collect()
}

/// Settings of the flexible character accuracy search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FcaConfig {
    #[serde(default)]
    pub grid: CoefficientGrid,

    /// Evaluate the grid on a rayon thread pool.
    #[serde(default)]
    pub parallel: bool,

    /// Bound of each memo cache, in entries.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for FcaConfig {
    fn default() -> Self {
        Self {
            grid: CoefficientGrid::default(),
            parallel: false,
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Top-level evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,

    #[serde(default)]
    pub fca: FcaConfig,

    /// Edit costs for the bag metrics and character accuracy.
    #[serde(default)]
    pub weights: Weights,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            fca: FcaConfig::default(),
            weights: Weights::default(),
        }
    }
}

fn default_metrics() -> Vec<Metric> {
    vec![Metric::Cer, Metric::Wer]
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl EvaluationConfig {
    /// Check values serde cannot: grid ranges, cache bound and metric/weight combinations.
    ///
    /// # Errors
    ///
    /// Returns `OcrEvalError::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.fca.grid.validate()?;
        if self.fca.cache_capacity == 0 {
            return Err(OcrEvalError::validation("fca.cache_capacity must be positive"));
        }
        if self.metrics.is_empty() {
            return Err(OcrEvalError::validation("at least one metric must be configured"));
        }
        if self.metrics.contains(&Metric::Wer) && !self.weights.is_unit() {
            return Err(OcrEvalError::validation(
                "word accuracy does not support weights other than 1/1/1",
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `OcrEvalError::Validation` if the file cannot be read, is not valid TOML,
    /// or holds invalid values. Parse failures keep the parser error as their source.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| OcrEvalError::validation_with_source(format!("Invalid TOML in {}: {}", path.display(), e), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .map_err(|e| OcrEvalError::validation_with_source(format!("Invalid YAML in {}: {}", path.display(), e), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| OcrEvalError::validation_with_source(format!("Invalid JSON in {}: {}", path.display(), e), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, choosing the format by file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(OcrEvalError::validation(format!(
                "Unsupported config file format: {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `ocreval.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(OcrEvalError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!("Using configuration from {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| OcrEvalError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
