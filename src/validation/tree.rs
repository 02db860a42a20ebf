//! Validation tree construction
//!
//! The tree mirrors the schema's nesting. Children are keyed by property
//! name, `pattern:<regex>`, `items`, `items[i]`, `prefixItems[i]`,
//! `allOf:i`/`anyOf:i`/`oneOf:i`, `not`, `$defs:<name>` and
//! `definitions:<name>`. Every node's cumulative error count is its own
//! issue count plus the cumulative counts of its children.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use super::messages::ValidationMessages;
use super::rules::{TypeValidation, ValidationIssue, validate_schema_by_type};
use crate::schema::{Items, ObjectSchema, SchemaMap, SchemaNode, SchemaType};

/// The type a node was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedType {
    /// The node is a bare `true`/`false` schema
    BooleanSchema,
    Declared(SchemaType),
}

impl DerivedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedType::BooleanSchema => "boolean-schema",
            DerivedType::Declared(t) => t.as_str(),
        }
    }
}

impl Serialize for DerivedType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Consistency verdict for one schema node and its descendants
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_type: Option<DerivedType>,
    pub validation: TypeValidation,
    pub children: IndexMap<String, ValidationNode>,
    pub cumulative_error_count: usize,
}

impl ValidationNode {
    /// Issues reported on this node alone
    pub fn own_error_count(&self) -> usize {
        self.validation.error_count()
    }

    /// Follow a chain of child keys
    pub fn descend(&self, keys: &[&str]) -> Option<&ValidationNode> {
        keys.iter()
            .try_fold(self, |node, key| node.children.get(*key))
    }
}

/// Build the validation tree for a schema document with the default messages
pub fn build_validation_tree(schema: &SchemaNode) -> ValidationNode {
    build_validation_tree_with(schema, &ValidationMessages::default())
}

/// Build the validation tree for a schema document
pub fn build_validation_tree_with(
    schema: &SchemaNode,
    messages: &ValidationMessages,
) -> ValidationNode {
    match schema {
        SchemaNode::Boolean(accepts) => boolean_node(*accepts, messages),
        SchemaNode::Object(object) => object_node(object, messages),
    }
}

fn boolean_node(accepts: bool, messages: &ValidationMessages) -> ValidationNode {
    let validation = if accepts {
        TypeValidation::success()
    } else {
        TypeValidation::from_issues(vec![ValidationIssue::untagged(&messages.false_schema)])
    };
    ValidationNode {
        derived_type: Some(DerivedType::BooleanSchema),
        cumulative_error_count: validation.error_count(),
        validation,
        children: IndexMap::new(),
    }
}

fn object_node(schema: &ObjectSchema, messages: &ValidationMessages) -> ValidationNode {
    let current_type = schema.primary_type();
    let validation = validate_schema_by_type(schema, current_type, messages);

    let mut children = IndexMap::new();
    let mut add = |key: String, child: &SchemaNode| {
        children.insert(key, build_validation_tree_with(child, messages));
    };

    if current_type == Some(SchemaType::Object) {
        for (name, child) in schema.properties.iter().flatten() {
            add(name.clone(), child);
        }
        for (pattern, child) in schema.pattern_properties.iter().flatten() {
            add(format!("pattern:{}", pattern), child);
        }
    }

    if current_type == Some(SchemaType::Array) {
        match &schema.items {
            Some(Items::Tuple(items)) => {
                for (idx, child) in items.iter().enumerate() {
                    add(format!("items[{}]", idx), child);
                }
            }
            Some(Items::Single(child)) => add("items".to_string(), child),
            None => {}
        }
        for (idx, child) in schema.prefix_items.iter().flatten().enumerate() {
            add(format!("prefixItems[{}]", idx), child);
        }
    }

    for (keyword, list) in [
        ("allOf", &schema.all_of),
        ("anyOf", &schema.any_of),
        ("oneOf", &schema.one_of),
    ] {
        for (idx, child) in list.iter().flatten().enumerate() {
            add(format!("{}:{}", keyword, idx), child);
        }
    }
    if let Some(not) = &schema.not {
        add("not".to_string(), not);
    }
    add_definitions(&mut add, "$defs", schema.defs.as_ref());
    add_definitions(&mut add, "definitions", schema.definitions.as_ref());

    let own_errors = validation.error_count();
    let child_errors: usize = children.values().map(|c| c.cumulative_error_count).sum();
    trace!(
        schema_type = current_type.map(|t| t.as_str()),
        own_errors, child_errors, "validated schema node"
    );

    ValidationNode {
        derived_type: current_type.map(DerivedType::Declared),
        validation,
        children,
        cumulative_error_count: own_errors + child_errors,
    }
}

fn add_definitions(
    add: &mut impl FnMut(String, &SchemaNode),
    prefix: &str,
    definitions: Option<&SchemaMap>,
) {
    for (name, child) in definitions.into_iter().flatten() {
        add(format!("{}:{}", prefix, name), child);
    }
}

/// Keeps the tree for the most recently seen schema document.
///
/// The cache key is the identity of the shared document, not its content:
/// handing over a new `Arc` (every edit produces one) triggers a full
/// rebuild, handing over the same `Arc` returns the stored tree.
#[derive(Debug, Default)]
pub struct ValidationTreeCache {
    messages: ValidationMessages,
    last: Option<(Arc<SchemaNode>, Arc<ValidationNode>)>,
}

impl ValidationTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: ValidationMessages) -> Self {
        Self {
            messages,
            last: None,
        }
    }

    /// The tree for `schema`, rebuilt only when the document changed identity
    pub fn tree_for(&mut self, schema: &Arc<SchemaNode>) -> Arc<ValidationNode> {
        if let Some((cached_schema, tree)) = &self.last {
            if Arc::ptr_eq(cached_schema, schema) {
                return Arc::clone(tree);
            }
        }
        debug!("schema document changed, rebuilding validation tree");
        let tree = Arc::new(build_validation_tree_with(schema, &self.messages));
        self.last = Some((Arc::clone(schema), Arc::clone(&tree)));
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ValidationNode {
        build_validation_tree(&serde_json::from_value(value).unwrap())
    }

    fn assert_aggregation(node: &ValidationNode) {
        let children: usize = node
            .children
            .values()
            .map(|child| {
                assert_aggregation(child);
                child.cumulative_error_count
            })
            .sum();
        assert_eq!(node.cumulative_error_count, node.own_error_count() + children);
    }

    #[test]
    fn test_single_number_node() {
        let root = tree(json!({"type": "number", "minimum": 10, "maximum": 5}));
        assert_eq!(root.cumulative_error_count, 1);
        assert!(root.validation.has_tag("minMax"));
        assert_eq!(root.derived_type, Some(DerivedType::Declared(SchemaType::Number)));
    }

    #[test]
    fn test_errors_bubble_from_properties() {
        let root = tree(json!({
            "type": "object",
            "properties": {"n": {"type": "number", "minimum": 10, "maximum": 5}}
        }));
        assert_eq!(root.own_error_count(), 0);
        assert_eq!(root.cumulative_error_count, 1);
        assert_eq!(root.children["n"].cumulative_error_count, 1);
    }

    #[test]
    fn test_boolean_schemas() {
        let accepting = build_validation_tree(&SchemaNode::Boolean(true));
        assert_eq!(accepting.cumulative_error_count, 0);
        assert_eq!(accepting.derived_type, Some(DerivedType::BooleanSchema));

        let rejecting = build_validation_tree(&SchemaNode::Boolean(false));
        assert_eq!(rejecting.cumulative_error_count, 1);
        assert!(rejecting.children.is_empty());
    }

    #[test]
    fn test_child_keys() {
        let root = tree(json!({
            "type": "object",
            "properties": {
                "list": {"type": "array", "items": {"type": "string"}, "prefixItems": [true]},
                "tuple": {"type": "array", "items": [{"type": "string"}, false]}
            },
            "patternProperties": {"^x-": {"type": "string"}},
            "allOf": [true],
            "anyOf": [true, true],
            "oneOf": [true],
            "not": {"type": "null"},
            "$defs": {"id": {"type": "string"}},
            "definitions": {"legacy": {"type": "integer"}}
        }));
        let keys: Vec<_> = root.children.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "list",
                "tuple",
                "pattern:^x-",
                "allOf:0",
                "anyOf:0",
                "anyOf:1",
                "oneOf:0",
                "not",
                "$defs:id",
                "definitions:legacy"
            ]
        );
        assert!(root.descend(&["list", "items"]).is_some());
        assert!(root.descend(&["list", "prefixItems[0]"]).is_some());
        assert!(root.descend(&["tuple", "items[1]"]).is_some());
        assert_eq!(root.cumulative_error_count, 1); // tuple's `false` entry
    }

    #[test]
    fn test_structural_children_depend_on_type() {
        let root = tree(json!({
            "properties": {"a": {"type": "number", "minimum": 3, "maximum": 1}},
            "items": {"type": "number", "minimum": 3, "maximum": 1},
            "anyOf": [{"type": "number", "minimum": 3, "maximum": 1}]
        }));
        // No declared type: only combinators are walked
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.cumulative_error_count, 1);
    }

    #[test]
    fn test_aggregation_on_deep_tree() {
        let root = tree(json!({
            "type": "object",
            "minProperties": 3,
            "maxProperties": 1,
            "properties": {
                "level1": {
                    "type": "object",
                    "properties": {
                        "level2": {
                            "type": "array",
                            "minItems": 5,
                            "maxItems": 1,
                            "items": {
                                "type": "object",
                                "properties": {
                                    "leaf": {"type": "string", "minLength": 4, "maxLength": 2},
                                    "num": {
                                        "type": "number",
                                        "minimum": 1,
                                        "exclusiveMinimum": 0,
                                        "maximum": 0
                                    }
                                }
                            }
                        }
                    }
                },
                "sibling": false
            }
        }));
        assert_aggregation(&root);
        // root minmax + level2 minmax + leaf length + num (minMax, redundantMinimum) + sibling
        assert_eq!(root.cumulative_error_count, 6);
        let level2 = root.descend(&["level1", "level2"]).unwrap();
        assert_eq!(level2.cumulative_error_count, 4);
    }

    #[test]
    fn test_cache_rebuilds_on_identity_change() {
        let mut cache = ValidationTreeCache::new();
        let schema = Arc::new(SchemaNode::typed(SchemaType::String));

        let first = cache.tree_for(&schema);
        let again = cache.tree_for(&schema);
        assert!(Arc::ptr_eq(&first, &again));

        let same_content = Arc::new(SchemaNode::typed(SchemaType::String));
        let rebuilt = cache.tree_for(&same_content);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(*first, *rebuilt);
    }

    #[test]
    fn test_serialized_shape() {
        let root = tree(json!({"type": "string", "minLength": 3, "maxLength": 1}));
        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(value["derivedType"], "string");
        assert_eq!(value["cumulativeErrorCount"], 1);
        assert_eq!(value["validation"]["success"], false);
        assert_eq!(value["validation"]["errors"][0]["path"], json!(["length"]));
    }
}
