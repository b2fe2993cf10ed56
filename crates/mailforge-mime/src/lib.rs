//! # mailforge-mime
//!
//! MIME message generation library for email.
//!
//! ## Features
//!
//! - **Message building**: Accumulate subject, sender, recipients,
//!   body, date and attachments, then render a valid .eml document
//! - **Attachments**: Binary-safe payloads with base64
//!   content-transfer-encoding, from memory or from disk
//! - **Header encoding**: RFC 2047 encoding for non-ASCII subject and
//!   sender values
//! - **Multipart**: multipart/mixed assembly with generated boundaries
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailforge_mime::MessageBuilder;
//!
//! let mut builder = MessageBuilder::new();
//! builder
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Test Message")
//!     .body("Hello, World!");
//!
//! println!("{}", builder.to_eml()?);
//! ```
//!
//! ## Working with Attachments
//!
//! ```ignore
//! use mailforge_mime::{Attachment, MessageBuilder};
//!
//! let attachment = Attachment::from_file("document.pdf", None)?;
//!
//! let mut builder = MessageBuilder::new();
//! builder
//!     .from("sender@example.com")
//!     .to(("Alice", "alice@example.com"))
//!     .subject("Document")
//!     .body("Please find the attached document.")
//!     .attach(attachment);
//!
//! let eml = builder.to_eml()?; // multipart/mixed, body part first
//! ```
//!
//! ## Dates
//!
//! ```ignore
//! use chrono::Utc;
//! use mailforge_mime::MessageBuilder;
//!
//! let mut builder = MessageBuilder::new();
//! builder.date(Utc::now());          // formatted RFC 2822 at render
//! builder.date(1_700_000_000_i64);   // epoch seconds work too
//! builder.date("Mon, 4 Aug 2025 10:00:00 +0000"); // verbatim
//! ```
//!
//! ## Encoding
//!
//! ```ignore
//! use mailforge_mime::encoding::{encode_base64, decode_base64, encode_rfc2047};
//!
//! let encoded = encode_base64(b"Hello, World!");
//! let decoded = decode_base64(&encoded)?;
//!
//! let header = encode_rfc2047("Héllo", "utf-8");
//! ```
//!
//! Untrusted filenames and header text are not sanitized: values
//! containing CR/LF would split headers. Callers must pre-validate
//! input that crosses a trust boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod attachment;
mod builder;
mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use attachment::{Attachment, AttachmentRecord, MimeSpec};
pub use builder::{MessageBuilder, MessageDate, MessageRecord, Recipient};
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};
