//! MIME encoding utilities.
//!
//! Supports Base64 content-transfer-encoding and RFC 2047 header
//! encoding.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Maximum line length for encoded message bodies.
const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as Base64 folded to 76-column lines with CRLF endings,
/// the form required for a `Content-Transfer-Encoding: base64` body.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut out = String::with_capacity(encoded.len() + 2 * (encoded.len() / MAX_LINE_LENGTH + 1));

    let mut rest = encoded.as_str();
    while rest.len() > MAX_LINE_LENGTH {
        let (line, tail) = rest.split_at(MAX_LINE_LENGTH);
        out.push_str(line);
        out.push_str("\r\n");
        rest = tail;
    }
    out.push_str(rest);
    out.push_str("\r\n");

    out
}

/// Encodes a header value using RFC 2047 encoding when needed.
///
/// Plain ASCII values pass through unchanged; anything else comes back
/// in the `=?charset?B?encoded-text?=` form.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    // Only encode if necessary (contains non-ASCII or RFC 2047 markers)
    if text.chars().all(|c| c.is_ascii() && c != '=' && c != '?') {
        return text.to_string();
    }

    let encoded = encode_base64(text.as_bytes());
    format!("=?{charset}?B?{encoded}?=")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_encode_decode() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");

        let decoded = decode_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_base64_wrapped_line_length() {
        let data = vec![0xAB_u8; 200];
        let encoded = encode_base64_wrapped(&data);

        for line in encoded.split("\r\n").filter(|l| !l.is_empty()) {
            assert!(line.len() <= MAX_LINE_LENGTH);
        }
        assert!(encoded.ends_with("\r\n"));
    }

    #[test]
    fn test_base64_wrapped_roundtrip() {
        let data = b"\x00\xFF\x10binary \x80 payload";
        let encoded = encode_base64_wrapped(data);
        let stripped: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(decode_base64(&stripped).unwrap(), data);
    }

    #[test]
    fn test_rfc2047_ascii_passthrough() {
        assert_eq!(encode_rfc2047("Hello", "utf-8"), "Hello");
    }

    #[test]
    fn test_rfc2047_encodes_non_ascii() {
        let encoded = encode_rfc2047("Héllo", "utf-8");
        assert!(encoded.starts_with("=?utf-8?B?"));
        assert!(encoded.ends_with("?="));

        let payload = encoded
            .trim_start_matches("=?utf-8?B?")
            .trim_end_matches("?=");
        assert_eq!(decode_base64(payload).unwrap(), "Héllo".as_bytes());
    }
}
