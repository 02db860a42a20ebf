//! Heuristic refinement passes for arrays of objects
//!
//! After the element schemas of an object array are unified, these passes
//! look at the raw elements again and tighten individual properties. They
//! match on property names and value distributions, so their output is a
//! best guess rather than a guaranteed type. Each pass costs one scan over
//! elements × properties, which dominates inference time on large arrays.

use std::cmp::Ordering;

use chrono::Utc;
use regex::Regex;
use serde_json::{Number, Value};
use tracing::debug;

use crate::schema::{
    Items, ObjectSchema, SchemaMap, SchemaNode, SchemaType, TypeSpec, number_is_integer,
};

const MILLIS_PER_YEAR: i64 = 365 * 24 * 60 * 60 * 1000;

/// A refinement over unified object properties and the raw array elements
pub trait PropertyPass {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Return the refined property map
    fn apply(&self, properties: SchemaMap, samples: &[Value]) -> SchemaMap;
}

/// Turns low-cardinality string/number properties into enums
#[derive(Debug, Clone)]
pub struct EnumDetection {
    pub min_items: usize,
    pub max_values: usize,
    pub max_ratio: f64,
}

impl Default for EnumDetection {
    fn default() -> Self {
        Self {
            min_items: 10,
            max_values: 10,
            max_ratio: 0.5,
        }
    }
}

impl EnumDetection {
    /// Distinct string/number values of `key`, or `None` once there are too many
    fn distinct_values(&self, key: &str, samples: &[Value]) -> Option<Vec<Value>> {
        let mut distinct: Vec<Value> = Vec::new();
        let values = samples
            .iter()
            .filter_map(|sample| sample.get(key))
            .filter(|value| value.is_string() || value.is_number());
        for value in values {
            if !distinct.iter().any(|seen| same_value(seen, value)) {
                if distinct.len() == self.max_values {
                    return None;
                }
                distinct.push(value.clone());
            }
        }
        Some(distinct)
    }
}

impl PropertyPass for EnumDetection {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn apply(&self, mut properties: SchemaMap, samples: &[Value]) -> SchemaMap {
        let total = samples.len();
        if total < self.min_items || properties.is_empty() {
            return properties;
        }

        for (key, schema) in properties.iter_mut() {
            let Some(schema_type) = schema.as_object().and_then(single_type) else {
                continue;
            };
            if !matches!(
                schema_type,
                SchemaType::String | SchemaType::Number | SchemaType::Integer
            ) {
                continue;
            }
            let Some(mut distinct) = self.distinct_values(key, samples) else {
                continue;
            };
            let count = distinct.len();
            if count <= 1 || (count as f64) >= total as f64 * self.max_ratio {
                continue;
            }

            distinct.sort_by(compare_enum_values);
            debug!(property = %key, values = count, "detected enum property");
            *schema = SchemaNode::Object(ObjectSchema {
                schema_type: Some(schema_type.into()),
                enum_values: Some(distinct),
                ..Default::default()
            });
        }
        properties
    }
}

/// Pins coordinate-like numeric arrays to a fixed length of 2 or 3
#[derive(Debug, Clone)]
pub struct CoordinateDetection {
    pub pattern: Regex,
}

impl CoordinateDetection {
    /// The common tuple length of `key` across all samples, if it is a valid coordinate
    fn coordinate_length(key: &str, samples: &[Value]) -> Option<usize> {
        let mut length = None;
        for value in samples.iter().filter_map(|sample| sample.get(key)) {
            let entries = value.as_array()?;
            let expected = *length.get_or_insert(entries.len());
            let valid = entries.len() == expected
                && (expected == 2 || expected == 3)
                && entries.iter().all(Value::is_number);
            if !valid {
                return None;
            }
        }
        length
    }
}

impl PropertyPass for CoordinateDetection {
    fn name(&self) -> &'static str {
        "coordinates"
    }

    fn apply(&self, mut properties: SchemaMap, samples: &[Value]) -> SchemaMap {
        for (key, schema) in properties.iter_mut() {
            if !self.pattern.is_match(key) || !has_numeric_items(schema) {
                continue;
            }
            let Some(length) = Self::coordinate_length(key, samples) else {
                continue;
            };
            debug!(property = %key, length, "detected coordinate tuple");
            *schema = SchemaNode::Object(ObjectSchema {
                schema_type: Some(SchemaType::Array.into()),
                items: Some(SchemaNode::typed(SchemaType::Number).into()),
                min_items: Some(Number::from(length)),
                max_items: Some(Number::from(length)),
                ..Default::default()
            });
        }
        properties
    }
}

/// Annotates integer properties with timestamp-like names and plausible values
#[derive(Debug, Clone)]
pub struct TimestampDetection {
    pub pattern: Regex,
    pub floor_years: u32,
    pub reference_time_ms: Option<i64>,
}

impl TimestampDetection {
    /// Earliest epoch-millisecond value accepted as a timestamp
    pub fn floor_ms(&self) -> i64 {
        let now = self
            .reference_time_ms
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        now.saturating_sub(i64::from(self.floor_years).saturating_mul(MILLIS_PER_YEAR))
    }
}

impl PropertyPass for TimestampDetection {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn apply(&self, mut properties: SchemaMap, samples: &[Value]) -> SchemaMap {
        let floor = self.floor_ms() as f64;
        for (key, schema) in properties.iter_mut() {
            let is_integer = schema
                .as_object()
                .is_some_and(|s| s.is_type(SchemaType::Integer));
            if !self.pattern.is_match(key) || !is_integer {
                continue;
            }
            let plausible = samples
                .iter()
                .filter_map(|sample| sample.get(key))
                .all(|value| match value {
                    Value::Number(n) => {
                        number_is_integer(n) && n.as_f64().is_some_and(|v| v >= floor)
                    }
                    _ => false,
                });
            if !plausible {
                continue;
            }
            debug!(property = %key, "detected unix timestamp");
            *schema = SchemaNode::Object(ObjectSchema {
                schema_type: Some(SchemaType::Integer.into()),
                format: Some("unix-timestamp".to_string()),
                description: Some("Unix timestamp (likely milliseconds)".to_string()),
                ..Default::default()
            });
        }
        properties
    }
}

fn single_type(schema: &ObjectSchema) -> Option<SchemaType> {
    match &schema.schema_type {
        Some(TypeSpec::Single(t)) => Some(*t),
        _ => None,
    }
}

/// Array schema whose single `items` schema is numeric
fn has_numeric_items(schema: &SchemaNode) -> bool {
    let Some(object) = schema.as_object() else {
        return false;
    };
    if !object.is_type(SchemaType::Array) {
        return false;
    }
    match &object.items {
        Some(Items::Single(items)) => items.as_object().is_some_and(|i| {
            i.is_type(SchemaType::Number) || i.is_type(SchemaType::Integer)
        }),
        _ => false,
    }
}

/// Equality where `1` and `1.0` are the same number
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Numbers ascending, then strings in lexicographic order
fn compare_enum_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
