//! Check command implementation

use std::path::PathBuf;

use jsonschema_builder::SchemaNode;
use jsonschema_builder::validation::{
    ValidationMessages, ValidationNode, build_validation_tree_with,
};
use serde::Serialize;

use crate::error::CliError;
use crate::input::{load_input, load_json};

/// Arguments for the `check` command
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Schema file, or `-` for stdin
    pub schema: String,
    /// JSON file overriding the default issue messages
    pub messages: Option<PathBuf>,
    /// Print the whole validation tree as JSON
    pub json: bool,
}

/// One issue found while walking the tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Child keys from the root, joined with `/`
    pub location: String,
    pub tag: Option<String>,
    pub message: String,
}

/// Collect every issue in the tree, parents before children
pub fn collect_findings(node: &ValidationNode) -> Vec<Finding> {
    let mut findings = Vec::new();
    walk(node, String::new(), &mut findings);
    findings
}

fn walk(node: &ValidationNode, location: String, findings: &mut Vec<Finding>) {
    for issue in &node.validation.errors {
        findings.push(Finding {
            location: if location.is_empty() {
                "/".to_string()
            } else {
                location.clone()
            },
            tag: issue.tag().map(str::to_string),
            message: issue.message.clone(),
        });
    }
    // Subtrees without errors need no visit
    for (key, child) in node
        .children
        .iter()
        .filter(|(_, c)| c.cumulative_error_count > 0)
    {
        walk(child, format!("{}/{}", location, key), findings);
    }
}

/// Handle the `check` command, returning whether the schema is consistent
pub fn handle_check(args: &CheckArgs) -> Result<bool, CliError> {
    let content = load_input(&args.schema)?;
    let schema: SchemaNode = serde_json::from_str(&content)
        .map_err(|e| CliError::ParseError(args.schema.clone(), e.to_string()))?;

    let messages = match &args.messages {
        Some(path) => {
            let raw = load_json(&path.display().to_string())?;
            serde_json::from_value::<ValidationMessages>(raw)
                .map_err(|e| CliError::ParseError(path.display().to_string(), e.to_string()))?
        }
        None => ValidationMessages::default(),
    };

    let tree = build_validation_tree_with(&schema, &messages);

    if args.json {
        let rendered = serde_json::to_string_pretty(&tree)
            .map_err(|e| CliError::SerializationError(e.to_string()))?;
        println!("{}", rendered);
    } else {
        for finding in collect_findings(&tree) {
            match &finding.tag {
                Some(tag) => println!("{} [{}] {}", finding.location, tag, finding.message),
                None => println!("{} {}", finding.location, finding.message),
            }
        }
        println!("{} issue(s)", tree.cumulative_error_count);
    }

    Ok(tree.cumulative_error_count == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonschema_builder::validation::build_validation_tree;
    use serde_json::json;

    #[test]
    fn test_collect_findings_paths() {
        let schema: SchemaNode = serde_json::from_value(json!({
            "type": "object",
            "minProperties": 3,
            "maxProperties": 1,
            "properties": {
                "ok": {"type": "string"},
                "n": {"type": "number", "minimum": 10, "maximum": 5}
            }
        }))
        .unwrap();

        let findings = collect_findings(&build_validation_tree(&schema));
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].location, "/");
        assert_eq!(findings[1].location, "/n");
        assert_eq!(findings[1].tag.as_deref(), Some("minMax"));
    }

    #[test]
    fn test_false_schema_finding_is_untagged() {
        let findings = collect_findings(&build_validation_tree(&SchemaNode::Boolean(false)));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].tag, None);
    }
}
