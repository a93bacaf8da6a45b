//! XML text helpers shared by the decoder and the encoder.

mod escape;

pub use escape::{escape_text, escape_xml, resolve_entity, unescape_entities, unescape_xml};
