//! Schema inference engine for JSON data
//!
//! This module derives a JSON Schema from one sample document, detecting
//! types and string formats, and refining arrays of objects with a few
//! heuristics.
//!
//! ## Features
//!
//! - **Type inference** - `integer` vs `number`, `null`, nested objects and arrays
//! - **Format detection** - date, date-time, email, uuid and uri strings
//! - **Array unification** - element schemas of object arrays merge into one
//! - **Required detection** - non-null keys, or keys present in every element
//! - **Heuristics** - enums, coordinate tuples and unix timestamps
//!
//! ## Example
//!
//! ```rust
//! use jsonschema_builder::inference::{SchemaInferrer, create_schema_from_json};
//! use serde_json::json;
//!
//! let document = create_schema_from_json(&json!({"name": "Alice", "age": 30}));
//! assert_eq!(document.required, Some(vec!["age".to_string(), "name".to_string()]));
//!
//! let inferrer = SchemaInferrer::new();
//! let schema = inferrer.infer(&json!([1, 2.5]));
//! assert!(schema.to_value()["items"].get("oneOf").is_some());
//! ```

mod config;
mod error;
mod formats;
mod heuristics;
mod inferrer;
mod merge;

pub use config::{
    DEFAULT_COORDINATE_PATTERN, DEFAULT_SCHEMA_URI, DEFAULT_TIMESTAMP_PATTERN, InferenceConfig,
    InferenceConfigBuilder,
};
pub use error::InferenceError;
pub use formats::{Format, detect_format};
pub use heuristics::{CoordinateDetection, EnumDetection, PropertyPass, TimestampDetection};
pub use inferrer::{SchemaInferrer, create_schema_from_json, infer_schema};
pub use merge::{dedup_schemas, merge_schemas};
