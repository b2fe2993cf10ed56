//! Integration tests for message building and serialization.
//!
//! These exercise the full pipeline from builder configuration to the
//! rendered .eml text, including the multipart wire format.

use std::io::Write as _;

use chrono::DateTime;
use proptest::prelude::*;

use mailforge_mime::encoding::decode_base64;
use mailforge_mime::{Attachment, Error, Message, MessageBuilder};

/// Splits a rendered multipart document into its part sections.
fn split_parts<'a>(eml: &'a str, boundary: &str) -> Vec<&'a str> {
    let delimiter = format!("--{boundary}\r\n");
    let terminator = format!("--{boundary}--");

    let (_, rest) = eml
        .split_once(&delimiter)
        .expect("document has no first boundary");
    let (inner, _) = rest
        .split_once(&terminator)
        .expect("document has no terminating boundary");

    inner.split(&delimiter).collect()
}

/// Extracts and decodes the base64 payload of one part section.
fn decode_part_payload(section: &str) -> Vec<u8> {
    let (_, payload) = section
        .split_once("\r\n\r\n")
        .expect("part has no header/body separator");
    let stripped: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    decode_base64(&stripped).expect("part payload is not valid base64")
}

fn boundary_of(message: &Message) -> String {
    message
        .content_type()
        .expect("message has an invalid content type")
        .boundary()
        .expect("multipart message has no boundary")
        .to_string()
}

#[test]
fn single_part_document_body_matches() {
    let mut builder = MessageBuilder::new();
    builder
        .from("from@example.com")
        .to("foo@to.example.com")
        .to("bar@to.example.com")
        .subject("TITLE")
        .body("MESSAGE");

    let eml = builder.to_eml().expect("render failed");

    assert!(eml.contains("Subject: TITLE\r\n"));
    assert!(eml.contains("From: from@example.com\r\n"));
    assert!(eml.contains("To: foo@to.example.com, bar@to.example.com\r\n"));
    assert!(eml.contains("MIME-Version: 1.0\r\n"));
    assert!(eml.contains("Content-Type: text/plain; charset=utf-8\r\n"));

    let (_, body) = eml.split_once("\r\n\r\n").expect("no header separator");
    assert_eq!(body, "MESSAGE\r\n");
}

#[test]
fn unset_body_renders_as_empty_text() {
    let mut builder = MessageBuilder::new();
    builder.subject("no body");

    let eml = builder.to_eml().expect("render failed");
    let (_, body) = eml.split_once("\r\n\r\n").expect("no header separator");
    assert_eq!(body, "");
}

#[test]
fn multipart_has_n_plus_one_parts_in_order() {
    let mut builder = MessageBuilder::new();
    builder
        .body("cover letter")
        .attach(Attachment::new(b"first".to_vec(), "a.txt", "text/plain"))
        .attach(Attachment::new(b"second".to_vec(), "b.bin", ("application", "octet-stream")));

    let message = builder.build().expect("build failed");
    let boundary = boundary_of(&message);
    let eml = message.to_eml().expect("render failed");

    let parts = split_parts(&eml, &boundary);
    assert_eq!(parts.len(), 3);

    assert!(parts[0].contains("Content-Type: text/plain; charset=utf-8\r\n"));
    assert!(parts[0].contains("cover letter"));
    assert!(parts[1].contains("filename=\"a.txt\""));
    assert_eq!(decode_part_payload(parts[1]), b"first");
    assert!(parts[2].contains("filename=\"b.bin\""));
    assert_eq!(decode_part_payload(parts[2]), b"second");

    assert!(eml.ends_with(&format!("--{boundary}--\r\n")));
}

#[test]
fn body_part_comes_first_even_when_unset() {
    let mut builder = MessageBuilder::new();
    builder.attach(Attachment::new(b"payload".to_vec(), "x.bin", ("application", "octet-stream")));

    let message = builder.build().expect("build failed");
    let boundary = boundary_of(&message);
    let eml = message.to_eml().expect("render failed");

    let parts = split_parts(&eml, &boundary);
    assert_eq!(parts.len(), 2);
    assert!(parts[0].contains("Content-Type: text/plain; charset=utf-8\r\n"));
}

#[test]
fn named_and_bare_recipients_render_joined() {
    let mut builder = MessageBuilder::new();
    builder.recipients([("Alice", "a@x.com")]).to("b@x.com");

    let eml = builder.to_eml().expect("render failed");
    assert!(eml.contains("To: Alice <a@x.com>, b@x.com\r\n"));
}

#[test]
fn datetime_and_timestamp_render_identical_date_headers() {
    let timestamp = 1_700_000_000_i64;
    let datetime = DateTime::from_timestamp(timestamp, 0).expect("valid timestamp");

    let mut from_datetime = MessageBuilder::new();
    from_datetime.date(datetime);
    let mut from_timestamp = MessageBuilder::new();
    from_timestamp.date(timestamp);

    let first = from_datetime.build().expect("build failed");
    let second = from_timestamp.build().expect("build failed");
    assert_eq!(first.date(), second.date());
    assert!(first.date().is_some());
}

#[test]
fn mime_type_string_and_pair_render_identically() {
    let mut with_string = MessageBuilder::new();
    with_string.attach(Attachment::new(b"x".to_vec(), "f", "text/plain"));
    let mut with_pair = MessageBuilder::new();
    with_pair.attach(Attachment::new(b"x".to_vec(), "f", ("text", "plain")));

    let first = with_string.build().expect("build failed");
    let second = with_pair.build().expect("build failed");
    assert_eq!(
        first.parts[1].headers.get("Content-Type"),
        second.parts[1].headers.get("Content-Type")
    );
}

#[test]
fn malformed_mime_type_fails_at_render() {
    let mut builder = MessageBuilder::new();
    builder.attach(Attachment::new(b"x".to_vec(), "f", "bogus"));

    // Attaching succeeded; rendering reports the malformed type.
    assert!(matches!(
        builder.to_eml(),
        Err(Error::InvalidContentType(_))
    ));
}

#[test]
fn render_is_idempotent_up_to_the_boundary() {
    let mut builder = MessageBuilder::new();
    builder
        .subject("idempotent")
        .body("text")
        .attach(Attachment::new(b"bytes".to_vec(), "a.bin", ("application", "octet-stream")));

    let first = builder.build().expect("build failed");
    let second = builder.build().expect("build failed");

    let normalized_first = first
        .to_eml()
        .expect("render failed")
        .replace(&boundary_of(&first), "BOUNDARY");
    let normalized_second = second
        .to_eml()
        .expect("render failed")
        .replace(&boundary_of(&second), "BOUNDARY");

    assert_eq!(normalized_first, normalized_second);
}

#[test]
fn missing_file_fails_and_leaves_builder_unchanged() {
    let mut builder = MessageBuilder::new();
    builder.body("text");

    let result = builder.attach_file("/nonexistent/path/report.pdf", None);
    assert!(matches!(result, Err(Error::FileAccess { .. })));
    assert!(builder.record().attachments.is_empty());

    // The builder still renders single-part.
    let message = builder.build().expect("build failed");
    assert!(!message.is_multipart());
}

#[test]
fn attach_file_guesses_mime_type_from_extension() {
    let mut file = tempfile::NamedTempFile::with_suffix(".png").expect("temp file");
    file.write_all(b"\x89PNG fake").expect("write failed");

    let mut builder = MessageBuilder::new();
    builder
        .attach_file(file.path(), None)
        .expect("attach failed");

    let message = builder.build().expect("build failed");
    assert_eq!(
        message.parts[1].headers.get("Content-Type"),
        Some("image/png")
    );
    assert_eq!(decode_part_payload(&render_part(&message, 1)), b"\x89PNG fake");
}

/// Renders one part section of a built message.
fn render_part(message: &Message, index: usize) -> String {
    let boundary = boundary_of(message);
    let eml = message.to_eml().expect("render failed");
    split_parts(&eml, &boundary)[index].to_string()
}

#[test]
fn non_ascii_subject_and_sender_survive_encoding() {
    let mut builder = MessageBuilder::new();
    builder
        .subject("Grüße aus Köln")
        .from("Jürgen <j@example.com>")
        .to("plain@example.com");

    let eml = builder.to_eml().expect("render failed");

    // Encoded forms only; no raw non-ASCII leaks into these headers.
    for line in eml.lines().take_while(|l| !l.is_empty()) {
        if line.starts_with("Subject:") || line.starts_with("From:") {
            assert!(line.is_ascii(), "unencoded header line: {line}");
            assert!(line.contains("=?utf-8?B?"));
        }
    }
    assert!(eml.contains("To: plain@example.com\r\n"));
}

proptest! {
    /// Base64 transfer encoding must round-trip arbitrary binary
    /// payloads, including zero bytes and invalid UTF-8.
    #[test]
    fn attachment_payload_roundtrip(content in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let mut builder = MessageBuilder::new();
        builder.attach(Attachment::new(content.clone(), "blob.bin", ("application", "octet-stream")));

        let message = builder.build().expect("build failed");
        let decoded = decode_part_payload(&render_part(&message, 1));
        prop_assert_eq!(decoded, content);
    }
}
