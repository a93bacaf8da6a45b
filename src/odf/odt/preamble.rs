//! Document-level decode: pre-pass plus content.
//!
//! Before content events, the style document seeds the style table and the
//! metadata document yields the preamble:
//!
//! 1. `body` with `language`/`country` attributes, closed immediately
//! 2. `title`, `author`, `description` as open/text/close triples
//!
//! A missing metadata document only shortens the preamble. A missing style
//! document is fatal.

use super::decoder::{DecoderOptions, StructuralDecoder};
use super::event::StructuralEvent;
use crate::common::{DocumentLocale, DocumentMetadata, Error, Result};
use crate::odf::constants::STYLES_PART;
use crate::odf::core::{Attributes, OdtSource, XmlPart, parse_metadata};
#[cfg(feature = "odf")]
use std::path::Path;

/// Append the synthetic preamble events.
pub fn write_preamble(locale: &DocumentLocale, metadata: &DocumentMetadata, out: &mut Vec<StructuralEvent>) {
    if locale.language.is_some() || locale.country.is_some() {
        let mut attributes = Attributes::new();
        if let Some(language) = &locale.language {
            attributes.push("language", language.as_str());
        }
        if let Some(country) = &locale.country {
            attributes.push("country", country.as_str());
        }
        out.push(StructuralEvent::open_with("body", attributes));
        out.push(StructuralEvent::close("body"));
    }
    for (tag, value) in metadata.entries() {
        out.push(StructuralEvent::open(tag));
        out.push(StructuralEvent::text(value));
        out.push(StructuralEvent::close(tag));
    }
}

/// Read metadata, recovering from an unreadable part with an empty preamble.
fn read_metadata(meta: Option<&XmlPart>) -> DocumentMetadata {
    match meta.map(parse_metadata) {
        Some(Ok(metadata)) => {
            if !metadata.has_data() {
                log::debug!("Metadata part has no title, author or description");
            }
            metadata
        },
        Some(Err(e)) => {
            log::warn!("Ignoring unreadable metadata: {}", e);
            DocumentMetadata::default()
        },
        None => DocumentMetadata::default(),
    }
}

/// Decode a document from its parts.
///
/// Returns every event or none: a malformed content stream aborts the
/// decode.
pub fn decode_source(source: &OdtSource, options: &DecoderOptions) -> Result<Vec<StructuralEvent>> {
    let styles = source
        .styles()
        .ok_or_else(|| Error::ComponentNotFound(STYLES_PART.to_string()))?;

    let mut decoder = StructuralDecoder::with_options(options.clone());
    decoder.seed_styles(styles)?;

    let mut events = Vec::new();
    if options.emit_preamble {
        let metadata = read_metadata(source.meta());
        write_preamble(decoder.locale(), &metadata, &mut events);
    }

    for notification in source.content().notifications() {
        decoder.feed(&notification?, &mut events)?;
    }
    decoder.finish()?;

    log::debug!("Decoded {} structural events", events.len());
    Ok(events)
}

/// Open an `.odt` file and decode it with default options.
#[cfg(feature = "odf")]
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Vec<StructuralEvent>> {
    let path = path.as_ref();
    let source = OdtSource::open(path)?;
    decode_source(&source, &DecoderOptions::default()).map_err(|e| match e {
        // A package without styles cannot be decoded; report it with the path
        Error::ComponentNotFound(part) => Error::UnreadableSource {
            path: path.to_path_buf(),
            reason: format!("missing {}", part),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
  xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0"
  xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0">
<office:styles>
<style:default-style style:family="paragraph"><style:text-properties fo:language="en" fo:country="US"/></style:default-style>
<style:style style:name="Emphasis" style:family="text"><style:text-properties fo:font-style="italic"/></style:style>
</office:styles>
</office:document-styles>"#;

    const META: &str = r#"<office:document-meta><office:meta>
<dc:title>Night Train</dc:title><meta:initial-creator>A. Writer</meta:initial-creator>
</office:meta></office:document-meta>"#;

    const CONTENT: &str = r#"<office:document-content><office:body><office:text>
<text:p text:style-name="Text_20_body">It was <text:span text:style-name="Emphasis">late</text:span>.</text:p>
</office:text></office:body></office:document-content>"#;

    #[test]
    fn test_preamble_precedes_content() {
        let source = OdtSource::from_parts(CONTENT, Some(STYLES.to_string()), Some(META.to_string()));
        let events = decode_source(&source, &DecoderOptions::default()).unwrap();
        let body: Attributes = [("language", "en"), ("country", "US")].into_iter().collect();
        assert_eq!(
            events,
            vec![
                StructuralEvent::open_with("body", body),
                StructuralEvent::close("body"),
                StructuralEvent::open("title"),
                StructuralEvent::text("Night Train"),
                StructuralEvent::close("title"),
                StructuralEvent::open("author"),
                StructuralEvent::text("A. Writer"),
                StructuralEvent::close("author"),
                StructuralEvent::open("p"),
                StructuralEvent::text("It was "),
                StructuralEvent::open("em"),
                StructuralEvent::text("late"),
                StructuralEvent::close("em"),
                StructuralEvent::text("."),
                StructuralEvent::close("p"),
            ]
        );
    }

    #[test]
    fn test_missing_metadata_is_tolerated() {
        let source = OdtSource::from_parts(CONTENT, Some(STYLES.to_string()), None);
        let events = decode_source(&source, &DecoderOptions::default()).unwrap();
        assert_eq!(events[2], StructuralEvent::open("p"));
    }

    #[test]
    fn test_unreadable_metadata_is_tolerated() {
        let source = OdtSource::from_parts(CONTENT, Some(STYLES.to_string()), Some("<a><b></a".to_string()));
        assert!(decode_source(&source, &DecoderOptions::default()).is_ok());
    }

    #[test]
    fn test_missing_styles_is_fatal() {
        let source = OdtSource::from_parts(CONTENT, None, Some(META.to_string()));
        let err = decode_source(&source, &DecoderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ComponentNotFound(ref part) if part == "styles.xml"));
    }

    #[test]
    fn test_preamble_can_be_disabled() {
        let source = OdtSource::from_parts(CONTENT, Some(STYLES.to_string()), Some(META.to_string()));
        let events = decode_source(&source, &DecoderOptions::new().with_preamble(false)).unwrap();
        assert_eq!(events[0], StructuralEvent::open("p"));
    }

    #[test]
    fn test_malformed_content_returns_no_events() {
        let source = OdtSource::from_parts(
            "<office:text><text:p>x</text:span></office:text>",
            Some(STYLES.to_string()),
            None,
        );
        let err = decode_source(&source, &DecoderOptions::default()).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_country_none_is_absent() {
        let styles = STYLES.replace(r#"fo:country="US""#, r#"fo:country="none""#);
        let source = OdtSource::from_parts(CONTENT, Some(styles), None);
        let events = decode_source(&source, &DecoderOptions::default()).unwrap();
        let body: Attributes = [("language", "en")].into_iter().collect();
        assert_eq!(events[0], StructuralEvent::open_with("body", body));
        assert_eq!(events[1], StructuralEvent::close("body"));
    }

    #[test]
    fn test_write_preamble_without_locale() {
        let mut events = Vec::new();
        let metadata = DocumentMetadata {
            description: Some("Blurb".to_string()),
            ..Default::default()
        };
        write_preamble(&DocumentLocale::default(), &metadata, &mut events);
        assert_eq!(
            events,
            vec![
                StructuralEvent::open("description"),
                StructuralEvent::text("Blurb"),
                StructuralEvent::close("description"),
            ]
        );
    }
}
