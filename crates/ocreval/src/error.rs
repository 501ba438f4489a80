//! Error types for ocreval.
//!
//! The scoring engine itself is pure and deterministic: comparing two sequences never
//! fails. Errors only arise at the edges, when configuration is loaded, when a value
//! object rejects its input, or when a caller asks for an unknown metric.
//!
//! - `Io` bubbles up unchanged from `std::io::Error`
//! - `Validation` covers invalid configuration and unsupported parameters
//! - `InvalidInput` covers value objects that refuse construction (e.g. non-NFC text)
//! - `UnsupportedMetric` names a metric this crate does not know
//!
//! Malformed TOML/YAML/JSON configuration is a `Validation` error carrying the
//! parser error as its source.
//!
//! Undefined rates (reference length 0) are not errors. They resolve to the
//! `f64::INFINITY` / `0.0` sentinels documented on the metric functions.
//!
//! # Example
//!
//! ```rust
//! use ocreval::{OcrEvalError, Result};
//!
//! fn checked_step(step: u32) -> Result<u32> {
//!     if step == 0 {
//!         return Err(OcrEvalError::validation("step must be positive"));
//!     }
//!     Ok(step)
//! }
//!
//! assert!(checked_step(0).is_err());
//! ```
use thiserror::Error;

/// Result type alias using `OcrEvalError`.
pub type Result<T> = std::result::Result<T, OcrEvalError>;

/// Main error type for all ocreval operations.
#[derive(Debug, Error)]
pub enum OcrEvalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported metric: {0}")]
    UnsupportedMetric(String),
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl OcrEvalError {
    error_constructor!(validation, Validation);
    error_constructor!(invalid_input, InvalidInput);
}
