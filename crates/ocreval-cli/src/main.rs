//! ocreval command-line interface.
//!
//! Compares an OCR result with its ground truth and prints the requested metrics as
//! one JSON object.
//!
//! ```text
//! ocreval gt.txt ocr.txt --metrics cer,wer,fca
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use ocreval::core::config::parse_metrics;
use ocreval::{EvaluationConfig, Evaluator, Metric};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ocreval")]
#[command(version)]
#[command(about = "Evaluate OCR results against ground truth", long_about = None)]
struct Cli {
    /// Ground truth text file (UTF-8)
    gt: PathBuf,

    /// OCR result text file (UTF-8)
    ocr: PathBuf,

    /// Metrics to compute: cer, wer, boc, bow, fca
    ///
    /// Overrides the metrics of the configuration file.
    #[arg(short, long, value_delimiter = ',', value_parser = parse_metric)]
    metrics: Option<Vec<Metric>>,

    /// Configuration file (.toml, .yaml, .yml or .json)
    ///
    /// Without it, `ocreval.toml` is looked up in the current directory and its parents.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Evaluate the flexible character accuracy grid in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Pretty-print the JSON report
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn parse_metric(value: &str) -> std::result::Result<Metric, String> {
    parse_metrics(value)
        .map_err(|e| e.to_string())?
        .into_iter()
        .next()
        .ok_or_else(|| "empty metric name".to_string())
}

fn load_config(path: Option<&Path>) -> Result<EvaluationConfig> {
    match path {
        Some(path) => EvaluationConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(EvaluationConfig::discover()
            .context("Failed to discover ocreval.toml")?
            .unwrap_or_default()),
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(metrics) = cli.metrics {
        config.metrics = metrics;
    }
    if cli.parallel {
        config.fca.parallel = true;
    }

    let gt = read_text(&cli.gt)?;
    let ocr = read_text(&cli.ocr)?;
    tracing::debug!("Evaluating {} against {}", cli.ocr.display(), cli.gt.display());

    let evaluator = Evaluator::new(config).context("Invalid configuration")?;
    let mut report = evaluator.evaluate(&gt, &ocr)?;
    report.gt = Some(cli.gt.display().to_string());
    report.ocr = Some(cli.ocr.display().to_string());

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}
