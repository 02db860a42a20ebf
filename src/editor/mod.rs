//! Schema property editing utilities
//!
//! Pure functions over schema nodes. Every operation takes the caller's
//! schema by reference and returns a new node; the input is never touched.
//! Boolean schemas have no property set, so object-shaped operations on
//! them return the input unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::{Items, ObjectSchema, SchemaNode, SchemaType};

static FIELD_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// A property of an object schema, flagged with its `required` membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub schema: SchemaNode,
    pub required: bool,
}

/// A `patternProperties` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternProperty {
    pub pattern: String,
    pub schema: SchemaNode,
}

/// Flattened description of a field as entered in an editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<SchemaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
}

impl NewField {
    /// Create a field with only a name and a type
    pub fn new(name: impl Into<String>, field_type: SchemaType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
            required: false,
            validation: None,
            additional_properties: None,
        }
    }
}

/// Outcome of checking a user-entered regex pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PatternValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Apply `edit` to a copy of an object schema; boolean schemas come back unchanged.
fn edit_object(schema: &SchemaNode, edit: impl FnOnce(&mut ObjectSchema)) -> SchemaNode {
    match schema {
        SchemaNode::Object(object) => {
            let mut copy = object.clone();
            edit(&mut copy);
            SchemaNode::Object(copy)
        }
        SchemaNode::Boolean(_) => schema.clone(),
    }
}

/// Insert or overwrite a property.
///
/// New names are appended; an existing name keeps its position. The target
/// map is created when absent.
pub fn update_object_property(
    schema: &SchemaNode,
    name: &str,
    property_schema: SchemaNode,
    is_pattern: bool,
) -> SchemaNode {
    edit_object(schema, |object| {
        object
            .property_map_mut(is_pattern)
            .get_or_insert_with(Default::default)
            .insert(name.to_string(), property_schema);
    })
}

/// Remove a property and its `required` entry.
///
/// Schemas without the relevant map are returned unchanged.
pub fn remove_object_property(schema: &SchemaNode, name: &str, is_pattern: bool) -> SchemaNode {
    if schema.with_object_schema(|s| s.property_map(is_pattern).is_none(), true) {
        return schema.clone();
    }
    edit_object(schema, |object| {
        if let Some(map) = object.property_map_mut(is_pattern) {
            map.shift_remove(name);
        }
        if let Some(required) = object.required.as_mut() {
            required.retain(|r| r != name);
        }
    })
}

/// Rename a property in place, keeping its position and `required` membership.
///
/// An absent `old_name` leaves the map as it was.
pub fn rename_object_property(
    schema: &SchemaNode,
    old_name: &str,
    new_name: &str,
    is_pattern: bool,
) -> SchemaNode {
    if schema.with_object_schema(|s| s.property_map(is_pattern).is_none(), true) {
        return schema.clone();
    }
    edit_object(schema, |object| {
        if let Some(map) = object.property_map_mut(is_pattern).take() {
            let renamed = map
                .into_iter()
                .map(|(key, value)| {
                    if key == old_name {
                        (new_name.to_string(), value)
                    } else {
                        (key, value)
                    }
                })
                .collect();
            *object.property_map_mut(is_pattern) = Some(renamed);
        }
        if let Some(required) = object.required.as_mut() {
            for entry in required.iter_mut().filter(|r| r.as_str() == old_name) {
                *entry = new_name.to_string();
            }
        }
    })
}

/// Add `name` to, or remove it from, the `required` list.
///
/// The list is treated as a set and the order of other entries is kept.
pub fn update_property_required(schema: &SchemaNode, name: &str, required: bool) -> SchemaNode {
    edit_object(schema, |object| {
        if required {
            let list = object.required.get_or_insert_with(Vec::new);
            if !list.iter().any(|r| r == name) {
                list.push(name.to_string());
            }
        } else if let Some(list) = object.required.as_mut() {
            list.retain(|r| r != name);
        }
    })
}

/// List the properties (or pattern properties) in declaration order
pub fn get_schema_properties(schema: &SchemaNode, is_pattern: bool) -> Vec<Property> {
    schema.with_object_schema(
        |object| {
            object
                .property_map(is_pattern)
                .map(|map| {
                    map.iter()
                        .map(|(name, property_schema)| Property {
                            name: name.clone(),
                            schema: property_schema.clone(),
                            required: object.is_required(name),
                        })
                        .collect()
                })
                .unwrap_or_default()
        },
        Vec::new(),
    )
}

/// List the `patternProperties` entries in declaration order
pub fn get_schema_pattern_properties(schema: &SchemaNode) -> Vec<PatternProperty> {
    schema.with_object_schema(
        |object| {
            object
                .pattern_properties
                .iter()
                .flatten()
                .map(|(pattern, property_schema)| PatternProperty {
                    pattern: pattern.clone(),
                    schema: property_schema.clone(),
                })
                .collect()
        },
        Vec::new(),
    )
}

/// Move a property between `properties` and `patternProperties`.
///
/// `is_pattern` names the map the property currently lives in. The move
/// drops the property from `required`.
pub fn toggle_pattern_property(schema: &SchemaNode, name: &str, is_pattern: bool) -> SchemaNode {
    let Some(property_schema) = schema
        .as_object()
        .and_then(|object| object.property_map(is_pattern))
        .and_then(|map| map.get(name))
        .cloned()
    else {
        return schema.clone();
    };
    let removed = remove_object_property(schema, name, is_pattern);
    update_object_property(&removed, name, property_schema, !is_pattern)
}

/// The `items` of an array-typed object schema
pub fn get_array_items_schema(schema: &SchemaNode) -> Option<&Items> {
    schema
        .as_object()
        .filter(|object| object.is_type(SchemaType::Array))
        .and_then(|object| object.items.as_ref())
}

/// Replace `items` on an array-typed object schema
pub fn update_array_items(schema: &SchemaNode, items: Items) -> SchemaNode {
    if !schema.with_object_schema(|s| s.is_type(SchemaType::Array), false) {
        return schema.clone();
    }
    edit_object(schema, |object| object.items = Some(items))
}

/// Whether the schema has nested fields worth expanding in a tree view
pub fn has_children(schema: &SchemaNode) -> bool {
    let Some(object) = schema.as_object() else {
        return false;
    };
    if object.is_type(SchemaType::Object) {
        return object.properties.as_ref().is_some_and(|p| !p.is_empty());
    }
    if object.is_type(SchemaType::Array) {
        if let Some(Items::Single(items)) = &object.items {
            return items.with_object_schema(
                |inner| inner.is_type(SchemaType::Object) && inner.properties.is_some(),
                false,
            );
        }
    }
    false
}

/// Build the schema for a new or edited field.
///
/// An object-form validation fragment wins over the field's `type` and
/// `description`, which only fill in what the fragment leaves unset.
/// `additionalProperties` is written only when explicitly `false`. A boolean
/// fragment is returned as is.
pub fn create_field_schema(field: &NewField) -> SchemaNode {
    let mut schema = match &field.validation {
        Some(SchemaNode::Boolean(b)) => return SchemaNode::Boolean(*b),
        Some(SchemaNode::Object(fragment)) => fragment.clone(),
        None => ObjectSchema::new(),
    };
    if schema.schema_type.is_none() {
        schema.schema_type = Some(field.field_type.into());
    }
    if schema.description.is_none() {
        schema.description = field.description.clone();
    }
    if field.additional_properties == Some(false) {
        schema.additional_properties = Some(Box::new(SchemaNode::Boolean(false)));
    }
    SchemaNode::Object(schema)
}

/// Lexical check of a property name: a non-empty identifier
pub fn validate_field_name(name: &str) -> bool {
    !name.trim().is_empty() && FIELD_NAME_REGEX.is_match(name)
}

/// Check that a pattern-property key compiles as a regular expression
pub fn validate_regex_pattern(pattern: &str) -> PatternValidation {
    if pattern.trim().is_empty() {
        return PatternValidation::failed("Pattern cannot be empty");
    }
    match Regex::new(pattern) {
        Ok(_) => PatternValidation::ok(),
        Err(e) => PatternValidation::failed(format!("Invalid regex: {}", e)),
    }
}
