//! Error types for schema inference

use thiserror::Error;

/// Errors that can occur during schema inference
///
/// Inference over an already parsed value never fails; these cover parsing
/// raw text and setting up an inferrer.
#[derive(Error, Debug, Clone)]
pub enum InferenceError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// A configured property-name pattern does not compile
    #[error("Invalid {name} pattern '{pattern}': {reason}")]
    InvalidPattern {
        name: &'static str,
        pattern: String,
        reason: String,
    },
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}
