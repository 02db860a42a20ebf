//! Per-type keyword consistency rules
//!
//! Each rule set looks only at the keywords that matter for its type and
//! reports issues tagged with the keyword or rule that failed, e.g.
//! `["minMax"]` or `["minLength"]`. Types without a rule set always pass.

use serde::Serialize;
use serde_json::{Number, Value};

use super::messages::ValidationMessages;
use crate::schema::{ObjectSchema, SchemaType, number_as_f64, number_is_integer};

/// One failed rule on a schema node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub message: String,
    pub path: Vec<String>,
}

impl ValidationIssue {
    pub fn new(message: &str, tag: &str) -> Self {
        Self {
            message: message.to_string(),
            path: vec![tag.to_string()],
        }
    }

    /// Issue without a rule tag
    pub fn untagged(message: &str) -> Self {
        Self {
            message: message.to_string(),
            path: Vec::new(),
        }
    }

    /// The rule tag, if any
    pub fn tag(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// Result of running a rule set against one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeValidation {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationIssue>,
}

impl TypeValidation {
    pub fn success() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Whether an issue with the given tag was reported
    pub fn has_tag(&self, tag: &str) -> bool {
        self.errors.iter().any(|e| e.tag() == Some(tag))
    }
}

/// Check that a lower and an upper bound leave room for at least one value.
///
/// A missing bound is always consistent. An exclusive bound on one side
/// needs a gap of at least 1, exclusive bounds on both sides a gap of 2.
pub fn range_consistent(
    min: Option<f64>,
    min_exclusive: bool,
    max: Option<f64>,
    max_exclusive: bool,
) -> bool {
    let (Some(min), Some(max)) = (min, max) else {
        return true;
    };
    if min > max {
        return false;
    }
    if min_exclusive && max_exclusive && max - min < 2.0 {
        return false;
    }
    if (min_exclusive || max_exclusive) && max - min < 1.0 {
        return false;
    }
    true
}

/// Run the rule set for `schema_type` against a node's keywords
pub fn validate_schema_by_type(
    schema: &ObjectSchema,
    schema_type: Option<SchemaType>,
    messages: &ValidationMessages,
) -> TypeValidation {
    let issues = match schema_type {
        Some(SchemaType::String) => string_rules(schema, messages),
        Some(SchemaType::Number) => number_rules(schema, messages),
        Some(SchemaType::Array) => array_rules(schema, messages),
        Some(SchemaType::Object) => object_rules(schema, messages),
        _ => Vec::new(),
    };
    TypeValidation::from_issues(issues)
}

/// Keywords present with a value of the wrong JSON type
fn check_keyword_types(
    schema: &ObjectSchema,
    keywords: &[&str],
    messages: &ValidationMessages,
    issues: &mut Vec<ValidationIssue>,
) {
    for keyword in keywords {
        if schema.has_ill_typed(keyword) {
            issues.push(ValidationIssue::new(&messages.invalid_type, keyword));
        }
    }
}

fn as_f64(n: Option<&Number>) -> Option<f64> {
    n.map(number_as_f64)
}

/// Length and count keywords must be non-negative integers
fn check_count(
    value: Option<&Number>,
    keyword: &str,
    messages: &ValidationMessages,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(n) = value else {
        return;
    };
    if !number_is_integer(n) {
        issues.push(ValidationIssue::new(&messages.int_value, keyword));
    }
    if number_as_f64(n) < 0.0 {
        issues.push(ValidationIssue::new(&messages.negative_length, keyword));
    }
}

fn check_count_range(
    min: Option<&Number>,
    max: Option<&Number>,
    message: &str,
    tag: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if !range_consistent(as_f64(min), false, as_f64(max), false) {
        issues.push(ValidationIssue::new(message, tag));
    }
}

fn string_rules(schema: &ObjectSchema, messages: &ValidationMessages) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    check_keyword_types(
        schema,
        &["minLength", "maxLength", "pattern", "format"],
        messages,
        &mut issues,
    );
    check_count(schema.min_length.as_ref(), "minLength", messages, &mut issues);
    check_count(schema.max_length.as_ref(), "maxLength", messages, &mut issues);
    check_count_range(
        schema.min_length.as_ref(),
        schema.max_length.as_ref(),
        &messages.string_length_range,
        "length",
        &mut issues,
    );
    issues
}

fn number_rules(schema: &ObjectSchema, messages: &ValidationMessages) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    check_keyword_types(
        schema,
        &[
            "minimum",
            "maximum",
            "exclusiveMinimum",
            "exclusiveMaximum",
            "multipleOf",
            "enum",
        ],
        messages,
        &mut issues,
    );

    if let Some(multiple_of) = as_f64(schema.multiple_of.as_ref()) {
        if multiple_of.is_nan() || multiple_of <= 0.0 {
            issues.push(ValidationIssue::new(&messages.positive, "multipleOf"));
        }
    }

    let minimum = as_f64(schema.minimum.as_ref());
    let maximum = as_f64(schema.maximum.as_ref());
    let exclusive_minimum = as_f64(schema.exclusive_minimum.as_ref());
    let exclusive_maximum = as_f64(schema.exclusive_maximum.as_ref());

    let bounds_consistent = range_consistent(minimum, false, maximum, false)
        && range_consistent(minimum, false, exclusive_maximum, true)
        && range_consistent(exclusive_minimum, true, maximum, false)
        && range_consistent(exclusive_minimum, true, exclusive_maximum, true);
    if !bounds_consistent {
        issues.push(ValidationIssue::new(&messages.number_min_max, "minMax"));
    }

    if minimum.is_some() && exclusive_minimum.is_some() {
        issues.push(ValidationIssue::new(&messages.number_both_min, "redundantMinimum"));
    }
    if maximum.is_some() && exclusive_maximum.is_some() {
        issues.push(ValidationIssue::new(&messages.number_both_max, "redundantMaximum"));
    }

    if let Some(values) = schema.enum_values.as_deref() {
        let in_range = |value: &Value| {
            let Some(v) = value.as_f64() else {
                return false;
            };
            minimum.is_none_or(|min| v >= min)
                && maximum.is_none_or(|max| v <= max)
                && exclusive_minimum.is_none_or(|min| v > min)
                && exclusive_maximum.is_none_or(|max| v < max)
        };
        if !values.iter().all(in_range) {
            issues.push(ValidationIssue::new(&messages.number_enum_out_of_range, "enum"));
        }
    }

    issues
}

fn array_rules(schema: &ObjectSchema, messages: &ValidationMessages) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    check_keyword_types(
        schema,
        &["minItems", "maxItems", "minContains", "maxContains", "uniqueItems"],
        messages,
        &mut issues,
    );
    check_count(schema.min_items.as_ref(), "minItems", messages, &mut issues);
    check_count(schema.max_items.as_ref(), "maxItems", messages, &mut issues);
    check_count(schema.min_contains.as_ref(), "minContains", messages, &mut issues);
    check_count(schema.max_contains.as_ref(), "maxContains", messages, &mut issues);
    check_count_range(
        schema.min_items.as_ref(),
        schema.max_items.as_ref(),
        &messages.array_min_max,
        "minmax",
        &mut issues,
    );
    check_count_range(
        schema.min_contains.as_ref(),
        schema.max_contains.as_ref(),
        &messages.array_contains_min_max,
        "minmaxContains",
        &mut issues,
    );
    issues
}

fn object_rules(schema: &ObjectSchema, messages: &ValidationMessages) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    check_keyword_types(
        schema,
        &["minProperties", "maxProperties", "required"],
        messages,
        &mut issues,
    );
    check_count(schema.min_properties.as_ref(), "minProperties", messages, &mut issues);
    check_count(schema.max_properties.as_ref(), "maxProperties", messages, &mut issues);
    check_count_range(
        schema.min_properties.as_ref(),
        schema.max_properties.as_ref(),
        &messages.object_min_max,
        "minmax",
        &mut issues,
    );
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: Value) -> TypeValidation {
        let Value::Object(map) = value else {
            panic!("rule fixtures are objects");
        };
        let schema = ObjectSchema::from_map(map).unwrap();
        let schema_type = schema.primary_type();
        validate_schema_by_type(&schema, schema_type, &ValidationMessages::default())
    }

    #[test]
    fn test_range_consistency() {
        assert!(range_consistent(Some(1.0), false, Some(1.0), false));
        assert!(!range_consistent(Some(2.0), false, Some(1.0), false));
        assert!(!range_consistent(Some(1.0), false, Some(1.5), true));
        assert!(range_consistent(Some(1.0), false, Some(2.0), true));
        assert!(!range_consistent(Some(1.0), true, Some(2.5), true));
        assert!(range_consistent(Some(1.0), true, Some(3.0), true));
        assert!(range_consistent(None, true, Some(3.0), true));
        assert!(range_consistent(Some(5.0), true, None, false));
    }

    #[test]
    fn test_number_min_greater_than_max() {
        let result = run(json!({"type": "number", "minimum": 10, "maximum": 5}));
        assert!(!result.success);
        assert_eq!(result.error_count(), 1);
        assert!(result.has_tag("minMax"));
    }

    #[test]
    fn test_number_exclusive_bounds_too_close() {
        let result = run(json!({"type": "number", "exclusiveMinimum": 1, "exclusiveMaximum": 2}));
        assert!(result.has_tag("minMax"));

        let ok = run(json!({"type": "number", "exclusiveMinimum": 1, "exclusiveMaximum": 3}));
        assert!(ok.success);
    }

    #[test]
    fn test_number_redundant_bounds() {
        let result = run(json!({
            "type": "number",
            "minimum": 0,
            "exclusiveMinimum": 0,
            "maximum": 100,
            "exclusiveMaximum": 200
        }));
        assert!(result.has_tag("redundantMinimum"));
        assert!(result.has_tag("redundantMaximum"));
        // minimum 0 / exclusiveMinimum 0 against the maxima are all consistent
        assert!(!result.has_tag("minMax"));
    }

    #[test]
    fn test_number_enum_range() {
        assert!(run(json!({"type": "number", "minimum": 1, "enum": [1, 2, 3]})).success);

        let out_of_range = run(json!({"type": "number", "maximum": 2, "enum": [1, 2, 3]}));
        assert!(out_of_range.has_tag("enum"));

        let exclusive = run(json!({"type": "number", "exclusiveMinimum": 1, "enum": [1, 2]}));
        assert!(exclusive.has_tag("enum"));

        let not_numeric = run(json!({"type": "number", "enum": [1, "two"]}));
        assert!(not_numeric.has_tag("enum"));
    }

    #[test]
    fn test_number_multiple_of() {
        assert!(run(json!({"type": "number", "multipleOf": 0})).has_tag("multipleOf"));
        assert!(run(json!({"type": "number", "multipleOf": 0.5})).success);
    }

    #[test]
    fn test_string_lengths() {
        let result = run(json!({"type": "string", "minLength": 5, "maxLength": 2}));
        assert_eq!(result.error_count(), 1);
        assert!(result.has_tag("length"));

        let fractional = run(json!({"type": "string", "minLength": 1.5}));
        assert!(fractional.has_tag("minLength"));

        let negative = run(json!({"type": "string", "maxLength": -1}));
        assert!(negative.has_tag("maxLength"));
    }

    #[test]
    fn test_array_counts() {
        let result = run(json!({
            "type": "array",
            "minItems": 3,
            "maxItems": 1,
            "minContains": 4,
            "maxContains": 2
        }));
        assert_eq!(result.error_count(), 2);
        assert!(result.has_tag("minmax"));
        assert!(result.has_tag("minmaxContains"));

        assert!(run(json!({"type": "array", "minItems": -2})).has_tag("minItems"));
        assert!(run(json!({"type": "array", "maxItems": 2.5})).has_tag("maxItems"));
    }

    #[test]
    fn test_object_counts() {
        let result = run(json!({"type": "object", "minProperties": 2, "maxProperties": 1}));
        assert!(result.has_tag("minmax"));
        assert!(run(json!({"type": "object", "minProperties": 1, "maxProperties": 1})).success);
    }

    #[test]
    fn test_ill_typed_keywords() {
        let result = run(json!({"type": "string", "minLength": "5", "maxLength": 2}));
        assert_eq!(result.error_count(), 1);
        assert!(result.has_tag("minLength"));

        let result = run(json!({"type": "number", "minimum": "0", "enum": 3}));
        assert!(result.has_tag("minimum"));
        assert!(result.has_tag("enum"));

        assert!(run(json!({"type": "object", "required": "id"})).has_tag("required"));
        assert!(run(json!({"type": "array", "maxItems": null})).has_tag("maxItems"));
        // keywords outside the node's rule set are ignored
        assert!(run(json!({"type": "boolean", "minLength": "5"})).success);
    }

    #[test]
    fn test_unknown_type_passes() {
        assert!(run(json!({"type": "date", "minLength": 5, "maxLength": 1})).success);
    }

    #[test]
    fn test_types_without_rules_pass() {
        assert!(run(json!({"type": "boolean", "minimum": 10, "maximum": 1})).success);
        assert!(run(json!({"minimum": 10, "maximum": 1})).success);
        assert!(run(json!({"type": "integer", "minimum": 10, "maximum": 1})).success);
    }
}
