//! Validate command implementation

use std::path::PathBuf;

use jsonschema_builder::instance::{InstanceValidation, validate_json};

use crate::error::CliError;
use crate::input::{load_input, load_json};

/// Arguments for the `validate` command
#[derive(Debug, Clone)]
pub struct ValidateArgs {
    /// Schema file to validate against
    pub schema: PathBuf,
    /// JSON document, or `-` for stdin
    pub input: String,
    /// Print the result as JSON
    pub json: bool,
}

/// Render a validation result for the terminal
pub fn format_result(result: &InstanceValidation) -> String {
    if result.valid {
        return "Validation successful".to_string();
    }
    let mut output = String::new();
    for error in &result.errors {
        let position = match (error.line, error.column) {
            (Some(line), Some(column)) => format!(" (line {}, column {})", line, column),
            _ => String::new(),
        };
        output.push_str(&format!("{}{}: {}\n", error.path, position, error.message));
    }
    output.push_str(&format!("{} error(s)", result.errors.len()));
    output
}

/// Handle the `validate` command, returning whether the document is valid
pub fn handle_validate(args: &ValidateArgs) -> Result<bool, CliError> {
    let schema = load_json(&args.schema.display().to_string())?;
    let content = load_input(&args.input)?;
    let result = validate_json(&content, &schema);

    if args.json {
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::SerializationError(e.to_string()))?;
        println!("{}", rendered);
    } else {
        println!("{}", format_result(&result));
    }
    Ok(result.valid)
}
