//! Configuration for schema inference

use serde::{Deserialize, Serialize};

/// Default `$schema` written on generated documents
pub const DEFAULT_SCHEMA_URI: &str = "https://json-schema.org/draft-07/schema";

/// Property names treated as coordinate tuples
pub const DEFAULT_COORDINATE_PATTERN: &str = r"(?i)coordinates?|coords?|latLon|lonLat|point";

/// Property names treated as timestamps
pub const DEFAULT_TIMESTAMP_PATTERN: &str = r"(?i)timestamp|createdAt|updatedAt|occurredAt";

/// Configuration for schema inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Enable string format detection (date, date-time, email, uuid, uri)
    pub detect_formats: bool,

    /// `$schema` of the generated document
    pub schema_uri: String,

    /// Minimum number of array elements before enum detection runs
    pub enum_min_items: usize,

    /// Maximum number of distinct values for a property to become an enum
    pub enum_max_values: usize,

    /// Distinct values must stay strictly below this share of the element count
    pub enum_max_ratio: f64,

    /// Regex matched against property names to find coordinate tuples
    pub coordinate_pattern: String,

    /// Regex matched against property names to find timestamps
    pub timestamp_pattern: String,

    /// Integers older than this many years are not taken for timestamps
    pub timestamp_floor_years: u32,

    /// Fixed "now" in epoch milliseconds (system clock when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_time_ms: Option<i64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            detect_formats: true,
            schema_uri: DEFAULT_SCHEMA_URI.to_string(),
            enum_min_items: 10,
            enum_max_values: 10,
            enum_max_ratio: 0.5,
            coordinate_pattern: DEFAULT_COORDINATE_PATTERN.to_string(),
            timestamp_pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            timestamp_floor_years: 50,
            reference_time_ms: None,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Enable or disable format detection
    pub fn detect_formats(mut self, detect: bool) -> Self {
        self.config.detect_formats = detect;
        self
    }

    /// Set the `$schema` URI of generated documents
    pub fn schema_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.schema_uri = uri.into();
        self
    }

    /// Set the minimum array length for enum detection
    pub fn enum_min_items(mut self, min: usize) -> Self {
        self.config.enum_min_items = min;
        self
    }

    /// Set the maximum number of distinct enum values
    pub fn enum_max_values(mut self, max: usize) -> Self {
        self.config.enum_max_values = max;
        self
    }

    /// Set the distinct-value share cap for enum detection
    pub fn enum_max_ratio(mut self, ratio: f64) -> Self {
        self.config.enum_max_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Override the coordinate property-name pattern
    pub fn coordinate_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.coordinate_pattern = pattern.into();
        self
    }

    /// Override the timestamp property-name pattern
    pub fn timestamp_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.timestamp_pattern = pattern.into();
        self
    }

    /// Set how far back a plausible timestamp may lie
    pub fn timestamp_floor_years(mut self, years: u32) -> Self {
        self.config.timestamp_floor_years = years;
        self
    }

    /// Pin "now" for the timestamp heuristic
    pub fn reference_time_ms(mut self, now_ms: i64) -> Self {
        self.config.reference_time_ms = Some(now_ms);
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
