//! Reading command inputs from files or stdin

use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::CliError;

/// Load input content from file, or from stdin when `input` is `-`
pub fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Load and parse a JSON document
pub fn load_json(input: &str) -> Result<Value, CliError> {
    let content = load_input(input)?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::ParseError(input.to_string(), e.to_string()))
}

/// Write to `output`, or print to stdout when no path is given
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, content)
            .map_err(|e| CliError::FileWriteError(path.clone(), e.to_string())),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
