//! ywodt - Transcoding between yWriter bracket markup and OpenDocument Text
//!
//! This library converts in both directions between the inline markup a
//! novel-writing tool keeps in its scene text and the style-referenced XML
//! of OpenDocument Text (`.odt`) files.
//!
//! # Features
//!
//! - **Structural decoder**: Turn ODT content into an ordered stream of
//!   headings, paragraphs, formatting spans, blockquotes, list items,
//!   sections and comments, resolving style indirection on the way
//! - **Markup encoder**: Turn `[i]`, `[b]`, `[lang=xx]` and `/* */` markup
//!   into nested ODT spans, balancing formatting across line breaks
//! - **Container access**: Read `content.xml`, `styles.xml` and `meta.xml`
//!   straight from an `.odt` package (feature `odf`, on by default)
//!
//! # Example - Decoding a document
//!
//! ```no_run
//! use ywodt::{StructuralEvent, decode_file};
//!
//! # fn main() -> Result<(), ywodt::Error> {
//! for event in decode_file("novel.odt")? {
//!     if let StructuralEvent::TagOpen { name, .. } = &event {
//!         println!("<{}>", name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Encoding markup
//!
//! ```
//! use ywodt::{EncoderOptions, encode};
//!
//! let options = EncoderOptions::new().with_languages(["fr"]);
//! let xml = encode("She said [lang=fr]bonjour[/lang=fr].", &options);
//! assert_eq!(
//!     xml,
//!     r#"<text:p text:style-name="Text_20_body">She said <text:span text:style-name="T1">bonjour</text:span>.</text:p>"#
//! );
//! ```

/// Shared infrastructure: errors, XML escaping and document metadata
pub mod common;

/// OpenDocument Text reading and structural decoding
///
/// This module contains the notification reader over ODT XML parts, the
/// style table, and the structural decoder state machine.
pub mod odf;

/// Bracket markup encoding
pub mod markup;

pub use common::{DocumentLocale, DocumentMetadata, Error, Result};
pub use markup::{EncoderOptions, ToOdtXml, encode};
#[cfg(feature = "odf")]
pub use odf::decode_file;
pub use odf::{DecoderOptions, Notification, OdtSource, StructuralDecoder, StructuralEvent, XmlPart, decode_source};
