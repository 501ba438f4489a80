//! Configuration and orchestration of metric runs.

pub mod config;
pub mod evaluator;

pub use config::{CONFIG_FILE_NAME, EvaluationConfig, FcaConfig, Metric, parse_metrics};
pub use evaluator::{Evaluator, evaluate};
