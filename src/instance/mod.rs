//! Instance validation
//!
//! Checks a JSON document against a schema with the `jsonschema` crate and
//! reports every violation with its JSON pointer and an approximate
//! position in the source text. Format assertions are off, so `format`
//! stays an annotation here just as it is in inference.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::schema::SchemaNode;

/// A single instance validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceError {
    /// JSON pointer into the instance, `/` for the document root
    pub path: String,
    pub message: String,
    /// 1-based line of the offending value, when it could be located
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column of the offending value, when it could be located
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl InstanceError {
    fn at_root(message: impl Into<String>) -> Self {
        Self {
            path: "/".to_string(),
            message: message.into(),
            line: None,
            column: None,
        }
    }
}

/// Outcome of validating a JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceValidation {
    pub valid: bool,
    pub errors: Vec<InstanceError>,
}

impl InstanceValidation {
    fn from_errors(errors: Vec<InstanceError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate JSON text against a schema
///
/// Never fails: empty input, syntax errors and schemas that do not compile
/// are all reported as a single error at `/`.
pub fn validate_json(input: &str, schema: &Value) -> InstanceValidation {
    if input.trim().is_empty() {
        return InstanceValidation::from_errors(vec![InstanceError::at_root("Empty JSON input")]);
    }

    let instance: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(e) => {
            return InstanceValidation::from_errors(vec![InstanceError {
                line: Some(e.line()),
                column: Some(e.column()),
                ..InstanceError::at_root(e.to_string())
            }]);
        }
    };

    let validator = match jsonschema::options()
        .should_validate_formats(false)
        .build(schema)
    {
        Ok(validator) => validator,
        Err(e) => {
            debug!(error = %e, "schema failed to compile");
            return InstanceValidation::from_errors(vec![InstanceError::at_root(format!(
                "Invalid schema: {e}"
            ))]);
        }
    };

    let errors: Vec<InstanceError> = validator
        .iter_errors(&instance)
        .map(|error| {
            let path = error.instance_path().to_string();
            let path = if path.is_empty() { "/".to_string() } else { path };
            let position = find_line_number_for_path(input, &path);
            InstanceError {
                message: error.to_string(),
                line: position.map(|(line, _)| line),
                column: position.map(|(_, column)| column),
                path,
            }
        })
        .collect();
    debug!(errors = errors.len(), "validated instance");
    InstanceValidation::from_errors(errors)
}

/// Validate JSON text against a schema node
pub fn validate_json_with(input: &str, schema: &SchemaNode) -> InstanceValidation {
    validate_json(input, &schema.to_value())
}

/// Locate a JSON pointer in pretty-printed JSON text
///
/// The root maps to line 1, column 1. Otherwise this returns the first line
/// containing the quoted last pointer segment, which is a heuristic: array
/// indices and repeated keys are not resolved.
pub fn find_line_number_for_path(text: &str, path: &str) -> Option<(usize, usize)> {
    let Some(last) = path.split('/').filter(|s| !s.is_empty()).next_back() else {
        return Some((1, 1));
    };
    let needle = format!("\"{}\"", last.replace("~1", "/").replace("~0", "~"));
    text.lines().enumerate().find_map(|(index, line)| {
        line.find(&needle)
            .map(|offset| (index + 1, line[..offset].chars().count() + 1))
    })
}
