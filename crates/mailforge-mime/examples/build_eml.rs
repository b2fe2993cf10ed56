#![allow(clippy::expect_used, clippy::uninlined_format_args)]
//! Example: Build a multipart message and print the .eml document
//!
//! ## Running
//!
//! ```bash
//! cargo run --package mailforge-mime --example build_eml
//! ```

use mailforge_mime::MessageBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = MessageBuilder::new();
    builder
        .to("foo@to.example.com")
        .to("bar@to.example.com")
        .from("from@example.com")
        .subject("TITLE")
        .body("MESSAGE")
        .attach_bytes(b"foo".to_vec(), "notes.txt", "text/plain");

    println!("{}", builder.to_eml()?);

    Ok(())
}
