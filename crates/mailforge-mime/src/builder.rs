//! Message builder: accumulates fields and renders MIME documents.

use crate::attachment::{Attachment, AttachmentRecord, MimeSpec};
use crate::content_type::ContentType;
use crate::encoding::encode_rfc2047;
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::message::{Message, Part};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::path::Path;

/// One entry of the `To:` header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Recipient {
    /// Bare address, rendered as-is.
    Address(String),
    /// Display name plus address, rendered as `Name <addr>`.
    Named {
        /// Display name.
        name: String,
        /// Email address.
        address: String,
    },
}

impl Recipient {
    /// Renders the recipient the way it appears in the `To:` header.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Address(address) => address.clone(),
            Self::Named { name, address } => format!("{name} <{address}>"),
        }
    }
}

impl From<&str> for Recipient {
    fn from(address: &str) -> Self {
        Self::Address(address.to_string())
    }
}

impl From<String> for Recipient {
    fn from(address: String) -> Self {
        Self::Address(address)
    }
}

impl From<(&str, &str)> for Recipient {
    fn from((name, address): (&str, &str)) -> Self {
        Self::Named {
            name: name.to_string(),
            address: address.to_string(),
        }
    }
}

impl From<(String, String)> for Recipient {
    fn from((name, address): (String, String)) -> Self {
        Self::Named { name, address }
    }
}

/// Date header input: either a pre-formatted string or a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MessageDate {
    /// Pre-formatted RFC 2822 date string, inserted verbatim.
    Formatted(String),
    /// Seconds since the Unix epoch, formatted at render time.
    Timestamp(i64),
}

impl MessageDate {
    /// Formats the date for the `Date:` header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DateOutOfRange`] for a timestamp chrono cannot
    /// represent.
    fn to_rfc2822(&self) -> Result<String> {
        match self {
            Self::Formatted(s) => Ok(s.clone()),
            Self::Timestamp(secs) => DateTime::from_timestamp(*secs, 0)
                .map(|dt| dt.to_rfc2822())
                .ok_or(Error::DateOutOfRange(*secs)),
        }
    }
}

impl From<&str> for MessageDate {
    fn from(formatted: &str) -> Self {
        Self::Formatted(formatted.to_string())
    }
}

impl From<String> for MessageDate {
    fn from(formatted: String) -> Self {
        Self::Formatted(formatted)
    }
}

impl From<i64> for MessageDate {
    fn from(secs: i64) -> Self {
        Self::Timestamp(secs)
    }
}

impl From<DateTime<Utc>> for MessageDate {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Timestamp(dt.timestamp())
    }
}

/// Accumulates message fields and renders them as a MIME document.
///
/// Setters chain on `&mut Self` and overwrite (last call wins);
/// recipients and attachments accumulate in insertion order. Rendering
/// never mutates the builder, so one builder can render repeatedly.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    subject: Option<String>,
    from: Option<String>,
    to: Vec<Recipient>,
    body: Option<String>,
    date: Option<MessageDate>,
    attachments: Vec<Attachment>,
}

impl MessageBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the plain text body.
    pub fn body(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the subject line.
    ///
    /// Non-ASCII subjects are RFC 2047-encoded at render time.
    pub fn subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the sender, either a bare address or a
    /// `"Display Name <addr>"` string.
    pub fn from(&mut self, from: impl Into<String>) -> &mut Self {
        self.from = Some(from.into());
        self
    }

    /// Appends one recipient.
    pub fn to(&mut self, recipient: impl Into<Recipient>) -> &mut Self {
        self.to.push(recipient.into());
        self
    }

    /// Appends several recipients, preserving their order.
    pub fn recipients<I, R>(&mut self, recipients: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Recipient>,
    {
        self.to.extend(recipients.into_iter().map(Into::into));
        self
    }

    /// Sets the date from a pre-formatted string, epoch seconds, or a
    /// `DateTime<Utc>` (converted to epoch seconds, UTC-based).
    ///
    /// Without a date the rendered message carries no `Date:` header.
    pub fn date(&mut self, date: impl Into<MessageDate>) -> &mut Self {
        self.date = Some(date.into());
        self
    }

    /// Appends an attachment.
    pub fn attach(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// Builds an attachment from in-memory bytes and appends it.
    pub fn attach_bytes(
        &mut self,
        content: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        mime_type: impl Into<MimeSpec>,
    ) -> &mut Self {
        self.attach(Attachment::new(content, filename, mime_type))
    }

    /// Reads a file and appends it as an attachment.
    ///
    /// The MIME type is guessed from the filename extension when
    /// `mime_type` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileAccess`] when the path cannot be read; the
    /// builder is left untouched.
    pub fn attach_file(
        &mut self,
        path: impl AsRef<Path>,
        mime_type: Option<MimeSpec>,
    ) -> Result<&mut Self> {
        let attachment = Attachment::from_file(path, mime_type)?;
        self.attachments.push(attachment);
        Ok(self)
    }

    /// Returns a read-only snapshot of the builder state.
    ///
    /// Diagnostics only; the wire format comes from [`Self::to_eml`].
    #[must_use]
    pub fn record(&self) -> MessageRecord {
        MessageRecord {
            subject: self.subject.clone(),
            from: self.from.clone(),
            to: self.to.iter().map(Recipient::render).collect(),
            body: self.body.clone(),
            date: self.date.clone(),
            attachments: self.attachments.iter().map(Attachment::record).collect(),
        }
    }

    /// Assembles the message tree.
    ///
    /// With no attachments the result is a single text part carrying
    /// the top-level headers; otherwise a multipart/mixed container
    /// whose first child is the body text (empty when unset) followed
    /// by the attachments in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContentType`] for a malformed
    /// string-form attachment MIME type and [`Error::DateOutOfRange`]
    /// for an unrepresentable timestamp.
    pub fn build(&self) -> Result<Message> {
        let mut headers = Headers::new();
        if let Some(date) = &self.date {
            headers.set("Date", date.to_rfc2822()?);
        }
        if let Some(from) = &self.from {
            headers.set("From", encode_rfc2047(from, "utf-8"));
        }
        if !self.to.is_empty() {
            let to: Vec<String> = self.to.iter().map(Recipient::render).collect();
            headers.set("To", to.join(", "));
        }
        if let Some(subject) = &self.subject {
            headers.set("Subject", encode_rfc2047(subject, "utf-8"));
        }
        headers.set("MIME-Version", "1.0");

        let text = Part::text(self.body.as_deref().unwrap_or_default());

        if self.attachments.is_empty() {
            // Single-part: the text part's headers land on the message.
            for (name, value) in text.headers.iter() {
                headers.set(name, value);
            }
            return Ok(Message::single_part(headers, text.body));
        }

        let boundary = make_boundary();
        headers.set(
            "Content-Type",
            ContentType::multipart_mixed(&boundary).to_string(),
        );

        let mut parts = vec![text];
        for attachment in &self.attachments {
            parts.push(attachment.render()?);
        }
        tracing::debug!(parts = parts.len(), %boundary, "assembled multipart message");

        Ok(Message::multipart(headers, parts))
    }

    /// Assembles the message and serializes it to an .eml text blob.
    ///
    /// # Errors
    ///
    /// Propagates every [`Self::build`] error; no partial output is
    /// produced.
    pub fn to_eml(&self) -> Result<String> {
        self.build()?.to_eml()
    }
}

/// Read-only snapshot of builder state for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageRecord {
    /// Subject line, if set.
    pub subject: Option<String>,
    /// Sender, if set.
    pub from: Option<String>,
    /// Rendered recipient entries.
    pub to: Vec<String>,
    /// Body text, if set.
    pub body: Option<String>,
    /// Date, if set.
    pub date: Option<MessageDate>,
    /// Attachment snapshots.
    pub attachments: Vec<AttachmentRecord>,
}

/// Creates a random alphanumeric MIME boundary token.
fn make_boundary() -> String {
    rand::thread_rng()
        .sample_iter(rand::distributions::Alphanumeric)
        .take(40)
        .map(char::from)
        .collect()
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

    #[test]
    fn test_setters_overwrite() {
        let mut builder = MessageBuilder::new();
        builder.subject("first").subject("second");
        assert_eq!(builder.record().subject.as_deref(), Some("second"));
    }

    #[test]
    fn test_recipients_accumulate_in_order() {
        let mut builder = MessageBuilder::new();
        builder
            .to(("Alice", "a@x.com"))
            .recipients(["b@x.com", "c@x.com"]);

        assert_eq!(
            builder.record().to,
            vec!["Alice <a@x.com>", "b@x.com", "c@x.com"]
        );
    }

    #[test]
    fn test_single_part_without_attachments() {
        let mut builder = MessageBuilder::new();
        builder
            .from("from@example.com")
            .to("to@example.com")
            .subject("TITLE")
            .body("MESSAGE");

        let message = builder.build().unwrap();
        assert!(!message.is_multipart());
        assert_eq!(message.body.as_deref(), Some("MESSAGE"));
        assert_eq!(
            message.headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
    }

    #[test]
    fn test_multipart_with_attachment() {
        let mut builder = MessageBuilder::new();
        builder
            .body("MESSAGE")
            .attach_bytes(b"foo".to_vec(), "text", "text/plain");

        let message = builder.build().unwrap();
        assert!(message.is_multipart());
        assert_eq!(message.parts.len(), 2);
        assert_eq!(message.parts[0].body, "MESSAGE");
        assert!(message.content_type().unwrap().boundary().is_some());
    }

    #[test]
    fn test_multipart_body_part_present_without_body() {
        let mut builder = MessageBuilder::new();
        builder.attach(Attachment::new(b"foo".to_vec(), "text", "text/plain"));

        let message = builder.build().unwrap();
        assert_eq!(message.parts.len(), 2);
        assert_eq!(message.parts[0].body, "");
    }

    #[test]
    fn test_date_timestamp_formats_rfc2822() {
        let mut builder = MessageBuilder::new();
        builder.date(0_i64);
        let message = builder.build().unwrap();
        assert_eq!(message.date(), Some("Thu, 1 Jan 1970 00:00:00 +0000"));
    }

    #[test]
    fn test_date_string_passes_through() {
        let mut builder = MessageBuilder::new();
        builder.date("Mon, 4 Aug 2025 10:00:00 +0000");
        let message = builder.build().unwrap();
        assert_eq!(message.date(), Some("Mon, 4 Aug 2025 10:00:00 +0000"));
    }

    #[test]
    fn test_no_date_header_when_unset() {
        let message = MessageBuilder::new().build().unwrap();
        assert!(message.date().is_none());
    }

    #[test]
    fn test_date_out_of_range() {
        let mut builder = MessageBuilder::new();
        builder.date(i64::MAX);
        assert!(matches!(builder.build(), Err(Error::DateOutOfRange(_))));
    }

    #[test]
    fn test_non_ascii_subject_encoded() {
        let mut builder = MessageBuilder::new();
        builder.subject("Héllo Wörld");
        let message = builder.build().unwrap();
        let subject = message.subject().unwrap();
        assert!(subject.starts_with("=?utf-8?B?"));
        assert!(subject.ends_with("?="));
    }

    #[test]
    fn test_boundary_is_fresh_per_build() {
        let mut builder = MessageBuilder::new();
        builder.attach(Attachment::new(b"x".to_vec(), "x.bin", ("application", "octet-stream")));

        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_ne!(
            first.content_type().unwrap().boundary(),
            second.content_type().unwrap().boundary()
        );
    }

    #[test]
    fn test_record_snapshot() {
        let mut builder = MessageBuilder::new();
        builder
            .subject("TITLE")
            .from("from@example.com")
            .to("to@example.com")
            .body("MESSAGE")
            .attach(Attachment::new(b"foo".to_vec(), "notes.txt", "text/plain"));

        let record = builder.record();
        assert_eq!(record.subject.as_deref(), Some("TITLE"));
        assert_eq!(record.attachments.len(), 1);
        assert_eq!(record.attachments[0].filename, "notes.txt");
    }
}
