//! Infer command implementation

use std::path::PathBuf;

use clap::ValueEnum;
use jsonschema_builder::{InferenceConfig, SchemaInferrer};
use tracing::info;

use crate::error::CliError;
use crate::input::{load_json, write_output};

/// Output encoding of the inferred document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Arguments for the `infer` command
#[derive(Debug, Clone)]
pub struct InferArgs {
    /// JSON sample file, or `-` for stdin
    pub input: String,
    pub format: OutputFormat,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
    pub detect_formats: bool,
    pub enum_min_items: Option<usize>,
    pub enum_max_values: Option<usize>,
}

impl InferArgs {
    fn config(&self) -> InferenceConfig {
        let mut builder = InferenceConfig::builder().detect_formats(self.detect_formats);
        if let Some(min) = self.enum_min_items {
            builder = builder.enum_min_items(min);
        }
        if let Some(max) = self.enum_max_values {
            builder = builder.enum_max_values(max);
        }
        builder.build()
    }
}

/// Handle the `infer` command
pub fn handle_infer(args: &InferArgs) -> Result<(), CliError> {
    let sample = load_json(&args.input)?;
    let inferrer = SchemaInferrer::with_config(args.config())?;
    let document = inferrer.create_schema(&sample);

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&document)
            .map_err(|e| CliError::SerializationError(e.to_string()))?,
        OutputFormat::Yaml => serde_yaml::to_string(&document)
            .map_err(|e| CliError::SerializationError(e.to_string()))?,
    };

    write_output(args.output.as_ref(), &rendered)?;
    if let Some(path) = &args.output {
        info!(output = %path.display(), "schema written");
    }
    Ok(())
}
