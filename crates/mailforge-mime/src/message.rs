//! Assembled MIME message tree and wire serialization.

use crate::content_type::ContentType;
use crate::error::{Error, Result};
use crate::header::Headers;
use std::fmt;

/// Content transfer encodings emitted by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit text.
    EightBit,
    /// Base64 encoding.
    Base64,
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

/// MIME message part.
///
/// The body is already transfer-encoded wire text; binary payloads are
/// base64-encoded before they become a part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body in wire form.
    pub body: String,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: String) -> Self {
        Self { headers, body }
    }

    /// Builds a text/plain part from body text.
    ///
    /// ASCII text is declared 7bit, anything else 8bit.
    #[must_use]
    pub fn text(text: &str) -> Self {
        let encoding = if text.is_ascii() {
            TransferEncoding::SevenBit
        } else {
            TransferEncoding::EightBit
        };

        let mut headers = Headers::new();
        headers.set("Content-Type", ContentType::text_plain().to_string());
        headers.set("Content-Transfer-Encoding", encoding.to_string());

        Self::new(headers, text.to_string())
    }
}

/// MIME message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Body for single-part messages.
    pub body: Option<String>,
    /// Child parts for multipart messages.
    pub parts: Vec<Part>,
}

impl Message {
    /// Creates a single-part message.
    #[must_use]
    pub const fn single_part(headers: Headers, body: String) -> Self {
        Self {
            headers,
            body: Some(body),
            parts: Vec::new(),
        }
    }

    /// Creates a multipart message.
    #[must_use]
    pub const fn multipart(headers: Headers, parts: Vec<Part>) -> Self {
        Self {
            headers,
            body: None,
            parts,
        }
    }

    /// Gets the content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Checks if this is a multipart message.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    /// Serializes the message to RFC 5322 wire text.
    ///
    /// Headers, a blank line, then the body; multipart children are
    /// delimited by `--boundary` lines and closed with `--boundary--`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBoundary`] for a multipart message whose
    /// Content-Type carries no boundary parameter, and
    /// [`Error::InvalidContentType`] if the Content-Type header cannot
    /// be parsed.
    pub fn to_eml(&self) -> Result<String> {
        let mut out = String::new();
        out.push_str(&self.headers.to_string());
        out.push_str("\r\n");

        if self.parts.is_empty() {
            if let Some(body) = &self.body {
                push_line(&mut out, body);
            }
            return Ok(out);
        }

        let content_type = self.content_type()?;
        let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;

        for part in &self.parts {
            out.push_str("--");
            out.push_str(boundary);
            out.push_str("\r\n");
            out.push_str(&part.headers.to_string());
            out.push_str("\r\n");
            push_line(&mut out, &part.body);
        }
        out.push_str("--");
        out.push_str(boundary);
        out.push_str("--\r\n");

        Ok(out)
    }
}

/// Appends text, guaranteeing it ends with CRLF.
fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    if !out.ends_with("\r\n") {
        out.push_str("\r\n");
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect
)]
mod tests {
    use super::*;

    fn text_message(body: &str) -> Message {
        let part = Part::text(body);
        let mut headers = part.headers.clone();
        headers.set("Subject", "Test");
        Message::single_part(headers, part.body)
    }

    #[test]
    fn test_transfer_encoding_display() {
        assert_eq!(TransferEncoding::SevenBit.to_string(), "7bit");
        assert_eq!(TransferEncoding::EightBit.to_string(), "8bit");
        assert_eq!(TransferEncoding::Base64.to_string(), "base64");
    }

    #[test]
    fn test_part_text_ascii_is_7bit() {
        let part = Part::text("Hello");
        assert_eq!(part.headers.get("Content-Transfer-Encoding"), Some("7bit"));
        assert_eq!(part.body, "Hello");
    }

    #[test]
    fn test_part_text_non_ascii_is_8bit() {
        let part = Part::text("Héllo");
        assert_eq!(part.headers.get("Content-Transfer-Encoding"), Some("8bit"));
    }

    #[test]
    fn test_single_part_to_eml() {
        let eml = text_message("Hello, World!").to_eml().unwrap();

        assert!(eml.contains("Subject: Test\r\n"));
        let (_, body) = eml.split_once("\r\n\r\n").unwrap();
        assert_eq!(body, "Hello, World!\r\n");
    }

    #[test]
    fn test_empty_single_part_body() {
        let eml = text_message("").to_eml().unwrap();
        assert!(eml.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_multipart_to_eml_delimiters() {
        let mut headers = Headers::new();
        headers.set(
            "Content-Type",
            ContentType::multipart_mixed("abc123").to_string(),
        );
        let message = Message::multipart(headers, vec![Part::text("Part 1"), Part::text("Part 2")]);

        let eml = message.to_eml().unwrap();
        assert_eq!(eml.matches("--abc123\r\n").count(), 2);
        assert!(eml.ends_with("--abc123--\r\n"));
    }

    #[test]
    fn test_multipart_without_boundary_fails() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "multipart/mixed");
        let message = Message::multipart(headers, vec![Part::text("Part 1")]);

        assert!(matches!(message.to_eml(), Err(Error::MissingBoundary)));
    }

    #[test]
    fn test_message_accessors() {
        let mut headers = Headers::new();
        headers.set("From", "sender@example.com");
        headers.set("To", "recipient@example.com");
        headers.set("Subject", "Test");
        headers.set("Date", "Thu, 1 Jan 1970 00:00:00 +0000");
        let message = Message::single_part(headers, String::new());

        assert_eq!(message.from(), Some("sender@example.com"));
        assert_eq!(message.to(), Some("recipient@example.com"));
        assert_eq!(message.subject(), Some("Test"));
        assert_eq!(message.date(), Some("Thu, 1 Jan 1970 00:00:00 +0000"));
        assert!(!message.is_multipart());
    }
}
