//! Attachment handling: staging binary content and rendering it as a
//! base64-encoded MIME part.

use crate::content_type::ContentType;
use crate::encoding::encode_base64_wrapped;
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::message::{Part, TransferEncoding};
use std::fmt;
use std::fs;
use std::path::Path;

/// A MIME type that has not been validated yet.
///
/// The string form splits into type and subtype when the attachment
/// renders, not when it is attached, so a malformed string surfaces as
/// a render error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MimeSpec {
    /// Unsplit `type/subtype` string.
    Raw(String),
    /// Already split (type, subtype) pair.
    Split(String, String),
}

impl MimeSpec {
    /// Resolves into a validated content type, splitting the string
    /// form on its first `/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContentType`] if a string form lacks the
    /// `type/subtype` shape.
    pub fn resolve(&self) -> Result<ContentType> {
        match self {
            Self::Raw(s) => ContentType::parse(s),
            Self::Split(main_type, sub_type) => {
                Ok(ContentType::new(main_type.clone(), sub_type.clone()))
            }
        }
    }
}

impl fmt::Display for MimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(s) => write!(f, "{s}"),
            Self::Split(main_type, sub_type) => write!(f, "{main_type}/{sub_type}"),
        }
    }
}

impl From<&str> for MimeSpec {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for MimeSpec {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl From<(&str, &str)> for MimeSpec {
    fn from((main_type, sub_type): (&str, &str)) -> Self {
        Self::Split(main_type.to_string(), sub_type.to_string())
    }
}

impl From<(String, String)> for MimeSpec {
    fn from((main_type, sub_type): (String, String)) -> Self {
        Self::Split(main_type, sub_type)
    }
}

impl From<ContentType> for MimeSpec {
    fn from(ct: ContentType) -> Self {
        Self::Split(ct.main_type, ct.sub_type)
    }
}

/// Binary attachment staged for rendering into a MIME part.
#[derive(Debug, Clone)]
pub struct Attachment {
    content: Vec<u8>,
    filename: String,
    mime_type: MimeSpec,
}

impl Attachment {
    /// Creates an attachment from in-memory bytes.
    pub fn new(
        content: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        mime_type: impl Into<MimeSpec>,
    ) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Reads an attachment from disk.
    ///
    /// The filename is the path's final component. When `mime_type` is
    /// `None` it is guessed from the filename extension; unknown
    /// extensions fall back to `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileAccess`] when the path cannot be read.
    pub fn from_file(path: impl AsRef<Path>, mime_type: Option<MimeSpec>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), size = content.len(), "read attachment");

        let filename = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mime_type = mime_type.unwrap_or_else(|| guess_mime_type(&filename));

        Ok(Self {
            content,
            filename,
            mime_type,
        })
    }

    /// Returns the raw content bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the filename used for the Content-Disposition header.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the MIME type as supplied or guessed.
    #[must_use]
    pub const fn mime_type(&self) -> &MimeSpec {
        &self.mime_type
    }

    /// Renders the attachment as a base64-encoded MIME part.
    ///
    /// The filename goes into the Content-Disposition header verbatim;
    /// callers must pre-validate untrusted names against CR/LF and
    /// quote characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContentType`] when a string-form MIME
    /// type lacks the `type/subtype` shape.
    pub fn render(&self) -> Result<Part> {
        let content_type = self.mime_type.resolve()?;

        let mut headers = Headers::new();
        headers.set("Content-Type", content_type.to_string());
        headers.set(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", self.filename),
        );
        headers.set(
            "Content-Transfer-Encoding",
            TransferEncoding::Base64.to_string(),
        );

        Ok(Part::new(headers, encode_base64_wrapped(&self.content)))
    }

    /// Returns a read-only snapshot for diagnostics.
    #[must_use]
    pub fn record(&self) -> AttachmentRecord {
        AttachmentRecord {
            filename: self.filename.clone(),
            mime_type: self.mime_type.to_string(),
            size: self.content.len(),
        }
    }
}

/// Read-only snapshot of an attachment for diagnostics.
///
/// Content is summarized by its size; the raw bytes never appear in a
/// dump.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttachmentRecord {
    /// Filename used for the Content-Disposition header.
    pub filename: String,
    /// MIME type as supplied or guessed.
    pub mime_type: String,
    /// Content size in bytes.
    pub size: usize,
}

/// Guesses a MIME type from a filename extension.
fn guess_mime_type(filename: &str) -> MimeSpec {
    mime_guess::from_path(filename).first_raw().map_or_else(
        || MimeSpec::from(ContentType::octet_stream()),
        |guess| MimeSpec::Raw(guess.to_string()),
    )
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
    use crate::encoding::decode_base64;
    use std::io::Write as _;

    #[test]
    fn test_mime_spec_string_and_pair_resolve_identically() {
        let from_str = MimeSpec::from("text/plain").resolve().unwrap();
        let from_pair = MimeSpec::from(("text", "plain")).resolve().unwrap();
        assert_eq!(from_str, from_pair);
    }

    #[test]
    fn test_mime_spec_malformed_string() {
        assert!(matches!(
            MimeSpec::from("bogus").resolve(),
            Err(Error::InvalidContentType(_))
        ));
    }

    #[test]
    fn test_render_headers() {
        let attachment = Attachment::new(b"data".to_vec(), "report.pdf", "application/pdf");
        let part = attachment.render().unwrap();

        assert_eq!(part.headers.get("Content-Type"), Some("application/pdf"));
        assert_eq!(
            part.headers.get("Content-Disposition"),
            Some("attachment; filename=\"report.pdf\"")
        );
        assert_eq!(
            part.headers.get("Content-Transfer-Encoding"),
            Some("base64")
        );
    }

    #[test]
    fn test_render_payload_roundtrip() {
        let content = b"\x00\x01\xFF\xFEnot utf8 \x80".to_vec();
        let attachment = Attachment::new(content.clone(), "blob.bin", ("application", "octet-stream"));
        let part = attachment.render().unwrap();

        let stripped: String = part.body.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(decode_base64(&stripped).unwrap(), content);
    }

    #[test]
    fn test_malformed_mime_type_fails_at_render_not_attach() {
        let attachment = Attachment::new(b"data".to_vec(), "x", "bogus");
        // Construction succeeded; only render reports the problem.
        assert!(attachment.render().is_err());
    }

    #[test]
    fn test_from_file_reads_content() {
        let mut file = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        file.write_all(b"not really a png").unwrap();

        let attachment = Attachment::from_file(file.path(), None).unwrap();
        assert_eq!(attachment.content(), b"not really a png");
        assert_eq!(attachment.mime_type().to_string(), "image/png");
    }

    #[test]
    fn test_from_file_unknown_extension_falls_back() {
        let file = tempfile::NamedTempFile::with_suffix(".no-such-ext").unwrap();
        let attachment = Attachment::from_file(file.path(), None).unwrap();
        assert_eq!(
            attachment.mime_type().to_string(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = Attachment::from_file("/nonexistent/path/file.bin", None);
        assert!(matches!(result, Err(Error::FileAccess { .. })));
    }

    #[test]
    fn test_record() {
        let attachment = Attachment::new(b"12345".to_vec(), "notes.txt", "text/plain");
        let record = attachment.record();
        assert_eq!(record.filename, "notes.txt");
        assert_eq!(record.mime_type, "text/plain");
        assert_eq!(record.size, 5);
    }
}
