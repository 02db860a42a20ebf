//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Invalid JSON in {0}: {1}")]
    ParseError(String, String),

    #[error("Inference failed: {0}")]
    InferenceError(#[from] jsonschema_builder::InferenceError),

    #[error("Serialization failed: {0}")]
    SerializationError(String),
}
