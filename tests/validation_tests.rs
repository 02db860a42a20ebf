//! Validation module tests

use jsonschema_builder::SchemaNode;
use jsonschema_builder::validation::{
    ValidationMessages, build_validation_tree, build_validation_tree_with,
};
use serde_json::json;

fn node(value: serde_json::Value) -> SchemaNode {
    serde_json::from_value(value).unwrap()
}

mod tree_tests {
    use super::*;

    #[test]
    fn test_inconsistent_number_node() {
        let tree =
            build_validation_tree(&node(json!({"type": "number", "minimum": 10, "maximum": 5})));
        assert_eq!(tree.cumulative_error_count, 1);
        assert!(tree.validation.has_tag("minMax"));
    }

    #[test]
    fn test_child_error_bubbles_to_root() {
        let tree = build_validation_tree(&node(json!({
            "type": "object",
            "properties": {"n": {"type": "number", "minimum": 10, "maximum": 5}}
        })));
        assert_eq!(tree.cumulative_error_count, 1);
        assert_eq!(tree.own_error_count(), 0);
        assert_eq!(tree.children["n"].cumulative_error_count, 1);
    }

    #[test]
    fn test_counts_aggregate_across_keywords() {
        let schema = node(json!({
            "type": "object",
            "properties": {
                "tags": {
                    "type": "array",
                    "minItems": 3,
                    "maxItems": 1,
                    "items": {"type": "string", "minLength": -1}
                },
                "choice": {
                    "anyOf": [
                        {"type": "number", "exclusiveMinimum": 1, "exclusiveMaximum": 2},
                        false
                    ]
                }
            },
            "patternProperties": {
                "^x-": {"type": "string", "minLength": 4, "maxLength": 2}
            },
            "$defs": {
                "ratio": {"type": "number", "multipleOf": 0}
            }
        }));

        let tree = build_validation_tree(&schema);
        assert_eq!(tree.descend(&["tags"]).unwrap().own_error_count(), 1);
        assert_eq!(tree.descend(&["tags", "items"]).unwrap().own_error_count(), 1);
        assert_eq!(tree.descend(&["choice", "anyOf:0"]).unwrap().own_error_count(), 1);
        assert_eq!(tree.descend(&["choice", "anyOf:1"]).unwrap().own_error_count(), 1);
        assert_eq!(tree.descend(&["pattern:^x-"]).unwrap().own_error_count(), 1);
        assert_eq!(tree.descend(&["$defs:ratio"]).unwrap().own_error_count(), 1);
        assert_eq!(tree.cumulative_error_count, 6);
    }

    #[test]
    fn test_malformed_keywords_still_build_a_tree() {
        let tree = build_validation_tree(&node(json!({
            "type": "object",
            "properties": {
                "when": {"type": "date", "minLength": 5, "maxLength": 1},
                "code": {"type": "string", "minLength": "5"},
                "n": {"type": "number", "minimum": 10, "maximum": 5}
            }
        })));

        let when = &tree.children["when"];
        assert_eq!(when.derived_type, None);
        assert_eq!(when.cumulative_error_count, 0);
        assert!(tree.children["code"].validation.has_tag("minLength"));
        assert!(tree.children["n"].validation.has_tag("minMax"));
        assert_eq!(tree.cumulative_error_count, 2);
    }

    #[test]
    fn test_tree_serializes_for_presentation() {
        let tree = build_validation_tree(&node(json!({
            "type": "object",
            "properties": {"flag": true}
        })));
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["derivedType"], "object");
        assert_eq!(value["cumulativeErrorCount"], 0);
        assert_eq!(value["children"]["flag"]["derivedType"], "boolean-schema");
    }
}

mod messages_tests {
    use super::*;

    #[test]
    fn test_custom_messages_are_used() {
        let messages: ValidationMessages =
            serde_json::from_value(json!({"numberMinMax": "Bereich ist leer"})).unwrap();
        let tree = build_validation_tree_with(
            &node(json!({"type": "number", "minimum": 3, "maximum": 1})),
            &messages,
        );
        assert_eq!(tree.validation.errors[0].message, "Bereich ist leer");
    }
}

#[cfg(feature = "schema-validation")]
mod instance_tests {
    use jsonschema_builder::inference::create_schema_from_json;
    use jsonschema_builder::instance::{validate_json, validate_json_with};

    use super::*;

    #[test]
    fn test_sample_validates_against_its_own_schema() {
        let sample = json!({
            "name": "Ada",
            "tags": ["math", "engines"],
            "born": "1815-12-10"
        });
        let schema = SchemaNode::Object(create_schema_from_json(&sample));
        let text = serde_json::to_string_pretty(&sample).unwrap();
        assert!(validate_json_with(&text, &schema).valid);
    }

    #[test]
    fn test_missing_required_property() {
        let schema =
            serde_json::to_value(create_schema_from_json(&json!({"name": "Ada"}))).unwrap();
        let result = validate_json("{\n  \"nickname\": \"A\"\n}", &schema);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "/");
    }
}
