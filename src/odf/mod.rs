//! OpenDocument Format (ODF) support.
//!
//! - `core` - package access, XML notification stream, metadata
//! - `elements` - element name dispatch
//! - `odt` - structural decoding of text documents
//! - `constants` - part paths, style and attribute names

pub mod constants;
pub mod core;
pub mod elements;
pub mod odt;

pub use core::{Notification, OdtSource, XmlPart};
pub use odt::{DecoderOptions, StructuralDecoder, StructuralEvent, decode_source};
#[cfg(feature = "odf")]
pub use odt::decode_file;
