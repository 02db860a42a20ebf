//! Messages attached to schema consistency issues
//!
//! Presentation layers that localize their UI pass their own table; the
//! default is English.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationMessages {
    /// A keyword's value has the wrong JSON type
    pub invalid_type: String,
    /// A length/count keyword is not an integer
    pub int_value: String,
    /// A length/count keyword is negative
    pub negative_length: String,
    /// `multipleOf` is not strictly positive
    pub positive: String,
    /// `minLength` exceeds `maxLength`
    pub string_length_range: String,
    /// Numeric bounds leave no representable value
    pub number_min_max: String,
    /// Both `minimum` and `exclusiveMinimum` are set
    pub number_both_min: String,
    /// Both `maximum` and `exclusiveMaximum` are set
    pub number_both_max: String,
    /// An `enum` entry is not a number or falls outside the bounds
    pub number_enum_out_of_range: String,
    /// `minItems` exceeds `maxItems`
    pub array_min_max: String,
    /// `minContains` exceeds `maxContains`
    pub array_contains_min_max: String,
    /// `minProperties` exceeds `maxProperties`
    pub object_min_max: String,
    /// The node is the boolean schema `false`
    pub false_schema: String,
}

impl Default for ValidationMessages {
    fn default() -> Self {
        Self {
            invalid_type: "Value has the wrong type".to_string(),
            int_value: "Value must be an integer".to_string(),
            negative_length: "Value must not be negative".to_string(),
            positive: "Value must be greater than 0".to_string(),
            string_length_range: "Minimum length must not exceed maximum length".to_string(),
            number_min_max: "Minimum and maximum leave no valid value".to_string(),
            number_both_min: "Use either minimum or exclusiveMinimum, not both".to_string(),
            number_both_max: "Use either maximum or exclusiveMaximum, not both".to_string(),
            number_enum_out_of_range: "Allowed values must be numbers within the range"
                .to_string(),
            array_min_max: "Minimum items must not exceed maximum items".to_string(),
            array_contains_min_max: "Minimum contains must not exceed maximum contains"
                .to_string(),
            object_min_max: "Minimum properties must not exceed maximum properties".to_string(),
            false_schema: "Schema does not accept any value".to_string(),
        }
    }
}
