//! JSON Schema builder - core library for authoring JSON Schema documents
//!
//! Provides:
//! - A typed schema model where every node is a boolean or an object schema
//! - Pure property editing operations for visual editors
//! - Self-validation of a schema's own keywords as an error-counted tree
//! - Schema inference from sample JSON documents
//! - Instance validation through the `jsonschema` crate (`schema-validation` feature)

pub mod editor;
pub mod inference;
#[cfg(feature = "schema-validation")]
pub mod instance;
pub mod schema;
pub mod validation;

// Re-export commonly used types
pub use schema::{Items, ObjectSchema, SchemaMap, SchemaNode, SchemaType, TypeSpec};

pub use editor::{NewField, PatternProperty, PatternValidation, Property};
pub use inference::{
    InferenceConfig, InferenceError, SchemaInferrer, create_schema_from_json, infer_schema,
};
#[cfg(feature = "schema-validation")]
pub use instance::{InstanceError, InstanceValidation, validate_json};
pub use validation::{
    TypeValidation, ValidationIssue, ValidationMessages, ValidationNode, build_validation_tree,
};
