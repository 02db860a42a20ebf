//! Schema self-validation
//!
//! Checks whether a schema document's own keywords are consistent with each
//! other (for example `minimum` not above `maximum`). This never validates
//! data against the schema. Every document, however inconsistent, yields a
//! complete [`ValidationNode`] tree whose error counts are aggregated from
//! the leaves up, ready for per-field error badges.
//!
//! ## Example
//!
//! ```
//! use jsonschema_builder::SchemaNode;
//! use jsonschema_builder::validation::build_validation_tree;
//!
//! let schema: SchemaNode = serde_json::from_value(serde_json::json!({
//!     "type": "object",
//!     "properties": {"n": {"type": "number", "minimum": 10, "maximum": 5}}
//! }))
//! .unwrap();
//!
//! let tree = build_validation_tree(&schema);
//! assert_eq!(tree.cumulative_error_count, 1);
//! assert!(tree.children["n"].validation.has_tag("minMax"));
//! ```

mod messages;
mod rules;
mod tree;

pub use messages::ValidationMessages;
pub use rules::{TypeValidation, ValidationIssue, range_consistent, validate_schema_by_type};
pub use tree::{
    DerivedType, ValidationNode, ValidationTreeCache, build_validation_tree,
    build_validation_tree_with,
};
