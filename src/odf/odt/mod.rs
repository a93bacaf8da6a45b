//! OpenDocument Text (.odt) structural decoding.
//!
//! This module turns the flat, style-referenced XML of an ODT document into
//! an ordered stream of semantic structural events.
//!
//! # Components
//!
//! - `styles.rs` - `StyleTable` and the `StyleCollector` feeding it
//! - `spans.rs` - `SpanStack` of open inline tags
//! - `comment.rs` - annotation capture sub-state
//! - `decoder.rs` - `StructuralDecoder` state machine and `ParserMode`
//! - `preamble.rs` - language/metadata pre-pass and whole-document decode
//! - `event.rs` - `StructuralEvent`, the decoder's output
//!
//! # Example
//!
//! ```no_run
//! use ywodt::odf::odt::decode_file;
//!
//! # fn main() -> ywodt::Result<()> {
//! for event in decode_file("novel.odt")? {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod comment;
mod decoder;
mod event;
mod preamble;
mod spans;
mod styles;

pub use comment::CommentCapture;
pub use decoder::{DecoderOptions, ParserMode, StructuralDecoder};
pub use event::{StructuralEvent, is_balanced};
#[cfg(feature = "odf")]
pub use preamble::decode_file;
pub use preamble::{decode_source, write_preamble};
pub use spans::{SpanStack, SpanTags};
pub use styles::{Language, StyleCollector, StyleRole, StyleTable, TextProperties};
