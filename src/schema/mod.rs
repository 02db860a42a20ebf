//! JSON Schema node model
//!
//! A schema node is either a boolean schema (`true` accepts everything,
//! `false` rejects everything) or an object schema carrying keywords.
//! Nodes are plain values: every editing operation in this crate returns a
//! fresh node and never mutates its input.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Number, Value};

/// Ordered map of named sub-schemas (`properties`, `patternProperties`, `$defs`).
pub type SchemaMap = IndexMap<String, SchemaNode>;

/// Primitive JSON Schema type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl SchemaType {
    /// Get the JSON Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Null => "null",
        }
    }
}

impl SchemaType {
    /// Look up a type by its JSON Schema name
    pub fn from_name(name: &str) -> Option<SchemaType> {
        match name {
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "integer" => Some(SchemaType::Integer),
            "boolean" => Some(SchemaType::Boolean),
            "object" => Some(SchemaType::Object),
            "array" => Some(SchemaType::Array),
            "null" => Some(SchemaType::Null),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `type` keyword: a single type name or a list of them
///
/// Names outside the seven JSON Schema types are kept as written in
/// `Unknown` so that the document still loads and round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
    Unknown(Value),
}

impl TypeSpec {
    /// The type a node is treated as: the single type, or the first listed one
    pub fn primary(&self) -> Option<SchemaType> {
        match self {
            TypeSpec::Single(t) => Some(*t),
            TypeSpec::Multiple(types) => types.first().copied(),
            TypeSpec::Unknown(Value::Array(names)) => names
                .first()
                .and_then(Value::as_str)
                .and_then(SchemaType::from_name),
            TypeSpec::Unknown(_) => None,
        }
    }

    /// Whether this is exactly the single type `t`
    pub fn is(&self, t: SchemaType) -> bool {
        matches!(self, TypeSpec::Single(s) if *s == t)
    }
}

impl From<SchemaType> for TypeSpec {
    fn from(t: SchemaType) -> Self {
        TypeSpec::Single(t)
    }
}

/// Value of the `items` keyword: one schema for every element, or a tuple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<SchemaNode>),
    Single(Box<SchemaNode>),
}

impl From<SchemaNode> for Items {
    fn from(node: SchemaNode) -> Self {
        Items::Single(Box::new(node))
    }
}

/// A JSON Schema node
///
/// Deserialization never rejects an object or a boolean. A known keyword
/// whose value has the wrong JSON type is kept in [`ObjectSchema::extra`]
/// under its own name, where the consistency rules report it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Boolean(bool),
    Object(ObjectSchema),
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(accepts) => Ok(SchemaNode::Boolean(accepts)),
            Value::Object(map) => ObjectSchema::from_map(map)
                .map(SchemaNode::Object)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a boolean or object schema, found {other}"
            ))),
        }
    }
}

const NUMBER_KEYWORDS: &[&str] = &[
    "minProperties",
    "maxProperties",
    "minItems",
    "maxItems",
    "minContains",
    "maxContains",
    "minLength",
    "maxLength",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
];
const STRING_KEYWORDS: &[&str] = &["$schema", "$id", "title", "description", "pattern", "format"];
const SCHEMA_MAP_KEYWORDS: &[&str] = &["properties", "patternProperties", "$defs", "definitions"];
const SCHEMA_LIST_KEYWORDS: &[&str] = &["prefixItems", "allOf", "anyOf", "oneOf"];

fn is_schema(value: &Value) -> bool {
    value.is_boolean() || value.is_object()
}

fn is_schema_list(value: &Value) -> bool {
    value.as_array().is_some_and(|list| list.iter().all(is_schema))
}

fn is_string_list(value: &Value) -> bool {
    value.as_array().is_some_and(|list| list.iter().all(Value::is_string))
}

/// Whether a keyword's value fits its typed field
fn keyword_fits(keyword: &str, value: &Value) -> bool {
    if NUMBER_KEYWORDS.contains(&keyword) {
        return value.is_number();
    }
    if STRING_KEYWORDS.contains(&keyword) {
        return value.is_string();
    }
    if SCHEMA_MAP_KEYWORDS.contains(&keyword) {
        return value.as_object().is_some_and(|map| map.values().all(is_schema));
    }
    if SCHEMA_LIST_KEYWORDS.contains(&keyword) {
        return is_schema_list(value);
    }
    match keyword {
        "type" => value.is_string() || is_string_list(value),
        "required" => is_string_list(value),
        "enum" => value.is_array(),
        "uniqueItems" => value.is_boolean(),
        "items" => is_schema(value) || is_schema_list(value),
        "additionalProperties" | "not" => is_schema(value),
        _ => true,
    }
}

/// An object-form JSON Schema
///
/// Keywords the engines in this crate read are typed fields; anything else
/// is carried through untouched in `extra`. Numeric keywords keep their
/// JSON number as written so that `10` stays `10` on output and non-integer
/// lengths can be reported instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    #[serde(rename = "$id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SchemaMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<SchemaMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_items: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_contains: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_contains: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaNode>>,

    #[serde(rename = "$defs", skip_serializing_if = "Option::is_none")]
    pub defs: Option<SchemaMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<SchemaMap>,

    /// Keywords without a typed field (`$ref`, `const`, `default`, `if`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectSchema {
    /// Create an empty schema (`{}`), which accepts anything
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from a keyword map, moving ill-typed keywords to `extra`
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let ill_typed: Vec<String> = map
            .iter()
            .filter(|(keyword, value)| !keyword_fits(keyword, value))
            .map(|(keyword, _)| keyword.clone())
            .collect();
        let misplaced: Vec<(String, Value)> = ill_typed
            .into_iter()
            .filter_map(|keyword| map.shift_remove(&keyword).map(|value| (keyword, value)))
            .collect();
        let mut schema: ObjectSchema = serde_json::from_value(Value::Object(map))?;
        schema.extra.extend(misplaced);
        Ok(schema)
    }

    /// Whether a known keyword is present with a value of the wrong JSON type
    pub fn has_ill_typed(&self, keyword: &str) -> bool {
        self.extra.contains_key(keyword)
    }

    /// Create a schema constrained only by `type`
    pub fn typed(t: SchemaType) -> Self {
        Self {
            schema_type: Some(TypeSpec::Single(t)),
            ..Default::default()
        }
    }

    /// The declared type, or the first of a declared type list
    pub fn primary_type(&self) -> Option<SchemaType> {
        self.schema_type.as_ref().and_then(TypeSpec::primary)
    }

    /// Whether `type` is exactly the single type `t`
    pub fn is_type(&self, t: SchemaType) -> bool {
        self.schema_type.as_ref().is_some_and(|spec| spec.is(t))
    }

    /// Whether `name` is listed in `required`
    pub fn is_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| required.iter().any(|r| r == name))
    }

    /// The property map or pattern-property map
    pub fn property_map(&self, is_pattern: bool) -> Option<&SchemaMap> {
        if is_pattern {
            self.pattern_properties.as_ref()
        } else {
            self.properties.as_ref()
        }
    }

    /// Mutable access to the property map or pattern-property map
    pub fn property_map_mut(&mut self, is_pattern: bool) -> &mut Option<SchemaMap> {
        if is_pattern {
            &mut self.pattern_properties
        } else {
            &mut self.properties
        }
    }
}

impl SchemaNode {
    /// The empty object schema `{}`
    pub fn empty() -> Self {
        SchemaNode::Object(ObjectSchema::new())
    }

    /// A schema constrained only by `type`
    pub fn typed(t: SchemaType) -> Self {
        SchemaNode::Object(ObjectSchema::typed(t))
    }

    pub fn is_boolean_schema(&self) -> bool {
        matches!(self, SchemaNode::Boolean(_))
    }

    pub fn is_object_schema(&self) -> bool {
        matches!(self, SchemaNode::Object(_))
    }

    /// Borrow the object form, if this is one
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            SchemaNode::Object(schema) => Some(schema),
            SchemaNode::Boolean(_) => None,
        }
    }

    /// Coerce to an object schema.
    ///
    /// Boolean schemas become the placeholder `{"type": "null"}`. The
    /// boolean's meaning is lost, so callers must not round-trip through this.
    pub fn as_object_schema(&self) -> ObjectSchema {
        match self {
            SchemaNode::Object(schema) => schema.clone(),
            SchemaNode::Boolean(_) => ObjectSchema::typed(SchemaType::Null),
        }
    }

    /// Apply `f` to the object form, or return `default` for boolean schemas
    pub fn with_object_schema<'a, T>(
        &'a self,
        f: impl FnOnce(&'a ObjectSchema) -> T,
        default: T,
    ) -> T {
        match self {
            SchemaNode::Object(schema) => f(schema),
            SchemaNode::Boolean(_) => default,
        }
    }

    /// The primary declared type of an object schema
    pub fn primary_type(&self) -> Option<SchemaType> {
        self.as_object().and_then(ObjectSchema::primary_type)
    }

    /// The description, or an empty string
    pub fn description(&self) -> &str {
        match self {
            SchemaNode::Object(schema) => schema.description.as_deref().unwrap_or(""),
            SchemaNode::Boolean(_) => "",
        }
    }

    /// Convert to a plain JSON value
    pub fn to_value(&self) -> Value {
        // Every field serializes to a JSON-compatible value with string keys.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Default for SchemaNode {
    fn default() -> Self {
        SchemaNode::empty()
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(schema: ObjectSchema) -> Self {
        SchemaNode::Object(schema)
    }
}

impl From<bool> for SchemaNode {
    fn from(b: bool) -> Self {
        SchemaNode::Boolean(b)
    }
}

/// Read a JSON number as `f64`
pub(crate) fn number_as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

/// Whether a JSON number is a mathematical integer (`3` and `3.0` both are)
pub(crate) fn number_is_integer(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}
