//! Format detection for string values

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Detected string format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// ISO 8601 date (YYYY-MM-DD)
    Date,
    /// ISO 8601 date-time with optional fraction and offset
    DateTime,
    /// Email address
    Email,
    /// UUID/GUID
    Uuid,
    /// http, https or ftp URI
    Uri,
}

impl Format {
    /// Get the JSON Schema format string for this format
    pub fn as_json_schema_format(&self) -> &'static str {
        match self {
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::Email => "email",
            Format::Uuid => "uuid",
            Format::Uri => "uri",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_json_schema_format())
    }
}

// Regex patterns for format detection
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?$").unwrap()
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static URI_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?|ftp)://[^\s/$.?#].[^\s]*$").unwrap());

/// Detect the format of a string value
///
/// Patterns are tried in a fixed order and the first match wins, so a value
/// that would satisfy two patterns always gets the earlier one.
pub fn detect_format(value: &str) -> Option<Format> {
    let checks: [(&Lazy<Regex>, Format); 5] = [
        (&DATE_REGEX, Format::Date),
        (&DATETIME_REGEX, Format::DateTime),
        (&EMAIL_REGEX, Format::Email),
        (&UUID_REGEX, Format::Uuid),
        (&URI_REGEX, Format::Uri),
    ];
    checks
        .into_iter()
        .find(|(regex, _)| regex.is_match(value))
        .map(|(_, format)| format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_date() {
        assert_eq!(detect_format("2024-01-15"), Some(Format::Date));
        assert_eq!(detect_format("2024-12-31"), Some(Format::Date));
        assert_ne!(detect_format("2024-1-15"), Some(Format::Date));
    }

    #[test]
    fn test_detect_datetime() {
        assert_eq!(detect_format("2024-01-15T10:30:00"), Some(Format::DateTime));
        assert_eq!(detect_format("2024-01-15T10:30:00Z"), Some(Format::DateTime));
        assert_eq!(
            detect_format("2024-01-15T10:30:00.123+05:00"),
            Some(Format::DateTime)
        );
        // Space separator is not ISO 8601
        assert_eq!(detect_format("2024-01-15 10:30:00"), None);
    }

    #[test]
    fn test_detect_email() {
        assert_eq!(detect_format("user@example.com"), Some(Format::Email));
        assert_eq!(
            detect_format("user.name+tag@domain.co.uk"),
            Some(Format::Email)
        );
        assert_eq!(detect_format("user@localhost"), None);
    }

    #[test]
    fn test_detect_uuid() {
        assert_eq!(
            detect_format("550e8400-e29b-41d4-a716-446655440000"),
            Some(Format::Uuid)
        );
        assert_eq!(
            detect_format("550E8400-E29B-41D4-A716-446655440000"),
            Some(Format::Uuid)
        );
    }

    #[test]
    fn test_detect_uri() {
        assert_eq!(detect_format("https://example.com"), Some(Format::Uri));
        assert_eq!(
            detect_format("http://localhost:8080/path"),
            Some(Format::Uri)
        );
        assert_eq!(
            detect_format("FTP://files.example.com/file.txt"),
            Some(Format::Uri)
        );
        assert_eq!(detect_format("mailto:someone"), None);
    }

    #[test]
    fn test_order_email_before_uri() {
        // Both the email and the uri pattern accept this; email comes first.
        assert_eq!(
            detect_format("http://user@example.com"),
            Some(Format::Email)
        );
    }

    #[test]
    fn test_plain_strings() {
        assert_eq!(detect_format(""), None);
        assert_eq!(detect_format("hello world"), None);
    }
}
