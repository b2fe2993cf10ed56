//! MIME content type handling.

use crate::error::{Error, Result};
use std::fmt;

/// MIME content type with parameters.
///
/// Parameters keep their insertion order, so a content type renders the
/// same text on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "png", "mixed").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8, boundary=xxx) in insertion order.
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a text/plain content type with UTF-8 charset.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// Creates an application/octet-stream content type.
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Creates a multipart/mixed content type with boundary.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed").with_parameter("boundary", boundary)
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// Returns the first value for a parameter key.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2=value2`. The
    /// type/subtype pair splits on the first `/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContentType`] if the `/` separator is
    /// missing or either side of it is empty.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts.next().unwrap_or_default().trim();
        let (main_type, sub_type) = type_str
            .split_once('/')
            .ok_or_else(|| Error::InvalidContentType(format!("Missing subtype in '{s}'")))?;

        let main_type = main_type.trim().to_lowercase();
        let sub_type = sub_type.trim().to_lowercase();
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(Error::InvalidContentType(format!(
                "Empty type or subtype in '{s}'"
            )));
        }

        let mut content_type = Self::new(main_type, sub_type);
        for param in parts {
            if let Some((key, value)) = param.trim().split_once('=') {
                content_type.parameters.push((
                    key.trim().to_lowercase(),
                    value.trim().trim_matches('"').to_string(),
                ));
            }
        }

        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;

        for (key, value) in &self.parameters {
            // Quote value if it contains special characters
            if value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c)) {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_new() {
        let ct = ContentType::new("text", "plain");
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "plain");
        assert!(ct.parameters.is_empty());
    }

    #[test]
    fn test_text_plain() {
        let ct = ContentType::text_plain();
        assert_eq!(ct.parameter("charset"), Some("utf-8"));
    }

    #[test]
    fn test_multipart_mixed() {
        let ct = ContentType::multipart_mixed("boundary123");
        assert_eq!(ct.main_type, "multipart");
        assert_eq!(ct.sub_type, "mixed");
        assert_eq!(ct.boundary(), Some("boundary123"));
        assert!(ct.is_multipart());
    }

    #[test]
    fn test_content_type_parse() {
        let ct = ContentType::parse("text/plain; charset=utf-8").unwrap();
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "plain");
        assert_eq!(ct.parameter("charset"), Some("utf-8"));
    }

    #[test]
    fn test_content_type_parse_splits_on_first_slash() {
        let ct = ContentType::parse("application/vnd.api+json").unwrap();
        assert_eq!(ct.main_type, "application");
        assert_eq!(ct.sub_type, "vnd.api+json");
    }

    #[test]
    fn test_content_type_parse_no_slash() {
        assert!(matches!(
            ContentType::parse("bogus"),
            Err(Error::InvalidContentType(_))
        ));
    }

    #[test]
    fn test_content_type_parse_empty_sides() {
        assert!(ContentType::parse("text/").is_err());
        assert!(ContentType::parse("/plain").is_err());
    }

    #[test]
    fn test_content_type_parse_quoted() {
        let ct = ContentType::parse("multipart/mixed; boundary=\"----=_Part_123\"").unwrap();
        assert_eq!(ct.boundary(), Some("----=_Part_123"));
    }

    #[test]
    fn test_content_type_display() {
        let ct = ContentType::text_plain();
        assert_eq!(ct.to_string(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_content_type_display_quotes_special_values() {
        let ct = ContentType::multipart_mixed("a b/c");
        assert_eq!(ct.to_string(), "multipart/mixed; boundary=\"a b/c\"");
    }

    #[test]
    fn test_content_type_display_is_stable() {
        let ct = ContentType::new("text", "plain")
            .with_parameter("charset", "iso-8859-1")
            .with_parameter("format", "flowed");
        assert_eq!(ct.to_string(), ct.to_string());
        assert_eq!(ct.to_string(), "text/plain; charset=iso-8859-1; format=flowed");
    }
}
