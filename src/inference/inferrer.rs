//! Schema inference engine

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};
use tracing::{debug, trace};

use super::config::{DEFAULT_COORDINATE_PATTERN, DEFAULT_TIMESTAMP_PATTERN, InferenceConfig};
use super::error::InferenceError;
use super::formats::detect_format;
use super::heuristics::{CoordinateDetection, EnumDetection, PropertyPass, TimestampDetection};
use super::merge::{dedup_schemas, merge_schemas};
use crate::schema::{ObjectSchema, SchemaMap, SchemaNode, SchemaType, number_is_integer};

const GENERATED_TITLE: &str = "Generated Schema";
const GENERATED_DESCRIPTION: &str = "Generated from JSON data";
const PRIMITIVE_TITLE: &str = "Generated Schema (Primitive Root)";
const PRIMITIVE_DESCRIPTION: &str = "Input was a primitive value, wrapped in an object.";

static COORDINATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_COORDINATE_PATTERN).unwrap());

static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(DEFAULT_TIMESTAMP_PATTERN).unwrap());

/// Schema inference engine
///
/// Derives a JSON Schema from a single sample document. Inference over a
/// parsed value is total: every JSON value yields a schema.
pub struct SchemaInferrer {
    config: InferenceConfig,
    /// Refinements applied, in order, to unified properties of object arrays
    passes: Vec<Box<dyn PropertyPass + Send + Sync>>,
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default configuration
    pub fn new() -> Self {
        let config = InferenceConfig::default();
        let passes = default_passes(&config);
        Self { config, passes }
    }

    /// Create a new schema inferrer with custom configuration
    ///
    /// Fails when one of the configured property-name patterns is not a valid regex.
    pub fn with_config(config: InferenceConfig) -> Result<Self, InferenceError> {
        let coordinates = compile("coordinate", &config.coordinate_pattern)?;
        let timestamps = compile("timestamp", &config.timestamp_pattern)?;
        let passes = build_passes(&config, coordinates, timestamps);
        Ok(Self { config, passes })
    }

    /// Get the active configuration
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer the schema of a single JSON value
    pub fn infer(&self, value: &Value) -> SchemaNode {
        match value {
            Value::Null => SchemaNode::typed(SchemaType::Null),
            Value::Bool(_) => SchemaNode::typed(SchemaType::Boolean),
            Value::Number(n) => self.infer_number(n),
            Value::String(s) => self.infer_string(s),
            Value::Array(items) => self.infer_array(items),
            Value::Object(map) => self.infer_object(map),
        }
    }

    /// Wrap the inferred schema in a root document
    ///
    /// The document always carries `$schema`, `title` and `description`.
    /// Object and array roots are lifted into the document; primitive roots
    /// are wrapped as a required `value` property of an object.
    pub fn create_schema(&self, value: &Value) -> ObjectSchema {
        let root = self.infer(value).as_object_schema();
        let mut document = ObjectSchema {
            schema_uri: Some(self.config.schema_uri.clone()),
            title: Some(GENERATED_TITLE.to_string()),
            description: Some(GENERATED_DESCRIPTION.to_string()),
            ..Default::default()
        };

        if root.is_type(SchemaType::Object) || root.properties.is_some() {
            document.schema_type = Some(SchemaType::Object.into());
            document.properties = root.properties;
            document.required = root.required;
        } else if root.is_type(SchemaType::Array) || root.items.is_some() {
            document.schema_type = Some(SchemaType::Array.into());
            document.items = root.items;
            document.min_items = root.min_items;
            document.max_items = root.max_items;
        } else if root.schema_type.is_some() {
            document.schema_type = Some(SchemaType::Object.into());
            document.title = Some(PRIMITIVE_TITLE.to_string());
            document.description = Some(PRIMITIVE_DESCRIPTION.to_string());
            document.properties = Some(IndexMap::from([(
                "value".to_string(),
                SchemaNode::Object(root),
            )]));
            document.required = Some(vec!["value".to_string()]);
        } else {
            document.schema_type = Some(SchemaType::Object.into());
        }
        document
    }

    /// Parse JSON text and wrap its inferred schema in a root document
    pub fn create_schema_from_str(&self, json: &str) -> Result<ObjectSchema, InferenceError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(self.create_schema(&value))
    }

    fn infer_number(&self, n: &Number) -> SchemaNode {
        if number_is_integer(n) {
            SchemaNode::typed(SchemaType::Integer)
        } else {
            SchemaNode::typed(SchemaType::Number)
        }
    }

    fn infer_string(&self, s: &str) -> SchemaNode {
        let mut schema = ObjectSchema::typed(SchemaType::String);
        if self.config.detect_formats {
            schema.format = detect_format(s).map(|f| f.as_json_schema_format().to_string());
        }
        SchemaNode::Object(schema)
    }

    fn infer_object(&self, map: &serde_json::Map<String, Value>) -> SchemaNode {
        let properties: SchemaMap = map
            .iter()
            .map(|(key, value)| (key.clone(), self.infer(value)))
            .collect();
        let required: Vec<String> = map
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, _)| key.clone())
            .collect();

        SchemaNode::Object(ObjectSchema {
            schema_type: Some(SchemaType::Object.into()),
            properties: Some(properties),
            required: sorted_or_none(required),
            ..Default::default()
        })
    }

    fn infer_array(&self, items: &[Value]) -> SchemaNode {
        let mut schema = ObjectSchema::typed(SchemaType::Array);
        if items.is_empty() {
            schema.items = Some(SchemaNode::empty().into());
            return SchemaNode::Object(schema);
        }

        let item_schemas: Vec<SchemaNode> = items.iter().map(|item| self.infer(item)).collect();
        let first_type = item_schemas[0].as_object_schema().schema_type;
        let all_same_type = item_schemas
            .iter()
            .all(|s| s.as_object_schema().schema_type == first_type);

        let items_schema = if all_same_type {
            if item_schemas[0].with_object_schema(|s| s.is_type(SchemaType::Object), false) {
                self.unify_objects(&item_schemas, items)
            } else {
                item_schemas[0].clone()
            }
        } else {
            let mut unique = dedup_schemas(item_schemas);
            if unique.len() == 1 {
                unique.remove(0)
            } else {
                SchemaNode::Object(ObjectSchema {
                    one_of: Some(unique),
                    ..Default::default()
                })
            }
        };

        schema.items = Some(items_schema.into());
        schema.min_items = Some(Number::from(0));
        SchemaNode::Object(schema)
    }

    /// Unify the schemas of an array of objects into one element schema
    ///
    /// Properties keep first-appearance order. A property is required when
    /// every element has it.
    fn unify_objects(&self, item_schemas: &[SchemaNode], samples: &[Value]) -> SchemaNode {
        let total = item_schemas.len();
        let mut merged: SchemaMap = IndexMap::new();
        let mut counts: IndexMap<String, usize> = IndexMap::new();

        for schema in item_schemas {
            let Some(properties) = schema.as_object().and_then(|s| s.properties.as_ref()) else {
                continue;
            };
            for (key, property) in properties {
                *counts.entry(key.clone()).or_insert(0) += 1;
                let unified = match merged.get(key) {
                    Some(existing) => merge_schemas(existing, property),
                    None => property.clone(),
                };
                merged.insert(key.clone(), unified);
            }
        }

        let required: Vec<String> = counts
            .into_iter()
            .filter(|(_, count)| *count == total)
            .map(|(key, _)| key)
            .collect();

        for pass in &self.passes {
            trace!(pass = pass.name(), "applying property pass");
            merged = pass.apply(merged, samples);
        }
        debug!(elements = total, properties = merged.len(), "unified object array");

        SchemaNode::Object(ObjectSchema {
            schema_type: Some(SchemaType::Object.into()),
            properties: Some(merged),
            required: sorted_or_none(required),
            ..Default::default()
        })
    }
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer the schema of a JSON value with the default configuration
pub fn infer_schema(value: &Value) -> SchemaNode {
    SchemaInferrer::new().infer(value)
}

/// Build a root schema document from a JSON value with the default configuration
pub fn create_schema_from_json(value: &Value) -> ObjectSchema {
    SchemaInferrer::new().create_schema(value)
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, InferenceError> {
    Regex::new(pattern).map_err(|e| InferenceError::InvalidPattern {
        name,
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn default_passes(config: &InferenceConfig) -> Vec<Box<dyn PropertyPass + Send + Sync>> {
    build_passes(
        config,
        Regex::clone(&COORDINATE_REGEX),
        Regex::clone(&TIMESTAMP_REGEX),
    )
}

fn build_passes(
    config: &InferenceConfig,
    coordinates: Regex,
    timestamps: Regex,
) -> Vec<Box<dyn PropertyPass + Send + Sync>> {
    vec![
        Box::new(EnumDetection {
            min_items: config.enum_min_items,
            max_values: config.enum_max_values,
            max_ratio: config.enum_max_ratio,
        }),
        Box::new(CoordinateDetection {
            pattern: coordinates,
        }),
        Box::new(TimestampDetection {
            pattern: timestamps,
            floor_years: config.timestamp_floor_years,
            reference_time_ms: config.reference_time_ms,
        }),
    ]
}

fn sorted_or_none(mut keys: Vec<String>) -> Option<Vec<String>> {
    if keys.is_empty() {
        return None;
    }
    keys.sort();
    Some(keys)
}
