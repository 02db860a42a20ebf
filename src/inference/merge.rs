//! Schema merging utilities
//!
//! Combines two schemas observed for the same field into one schema that
//! describes both observations.

use crate::schema::{ObjectSchema, SchemaNode, SchemaType};

/// Remove structural duplicates, keeping the first occurrence of each schema
pub fn dedup_schemas(schemas: impl IntoIterator<Item = SchemaNode>) -> Vec<SchemaNode> {
    let mut unique: Vec<SchemaNode> = Vec::new();
    for schema in schemas {
        if !unique.contains(&schema) {
            unique.push(schema);
        }
    }
    unique
}

/// Wrap alternatives in `oneOf`, or return the only one
fn one_of(mut alternatives: Vec<SchemaNode>) -> SchemaNode {
    if alternatives.len() == 1 {
        return alternatives.remove(0);
    }
    SchemaNode::Object(ObjectSchema {
        one_of: Some(alternatives),
        ..Default::default()
    })
}

/// Merge two schemas observed for the same field
///
/// - Identical schemas are returned unchanged.
/// - `integer` and `number` widen to `number`.
/// - Anything else becomes a `oneOf` of the distinct alternatives, extending
///   `first`'s existing `oneOf` when it has one.
///
/// The result is symmetric up to the order of the `oneOf` alternatives.
pub fn merge_schemas(first: &SchemaNode, second: &SchemaNode) -> SchemaNode {
    let s1 = first.as_object_schema();
    let s2 = second.as_object_schema();
    if s1 == s2 {
        return first.clone();
    }

    let integer_and_number = (s1.is_type(SchemaType::Integer) && s2.is_type(SchemaType::Number))
        || (s1.is_type(SchemaType::Number) && s2.is_type(SchemaType::Integer));
    if integer_and_number {
        return SchemaNode::typed(SchemaType::Number);
    }

    let addition = SchemaNode::Object(s2);
    let has_one_of = s1.one_of.is_some();
    let mut alternatives = match s1.one_of.clone() {
        Some(existing) => existing,
        None => vec![SchemaNode::Object(s1.clone())],
    };

    if alternatives.contains(&addition) {
        return if has_one_of {
            SchemaNode::Object(s1)
        } else {
            one_of(alternatives)
        };
    }

    alternatives.push(addition);
    one_of(dedup_schemas(alternatives))
}
