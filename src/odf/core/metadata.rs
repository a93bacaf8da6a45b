//! ODF metadata parsing functionality.
//!
//! Extracts the descriptive fields the decoder preamble forwards from
//! `meta.xml`: title, author and description.

use super::xml::{Notification, XmlPart};
use crate::common::{DocumentMetadata, Result};

/// Which metadata field the current character data belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    InitialCreator,
    Creator,
    Description,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "dc:title" => Some(Field::Title),
            "meta:initial-creator" => Some(Field::InitialCreator),
            "dc:creator" => Some(Field::Creator),
            "dc:description" => Some(Field::Description),
            _ => None,
        }
    }
}

/// Parse metadata from meta.xml content.
///
/// Only fields that are direct children of `office:meta` are considered.
/// Whitespace-only values count as absent. The initial creator is preferred
/// as author; the last editor (`dc:creator`) is the fallback.
pub fn parse_metadata(part: &XmlPart) -> Result<DocumentMetadata> {
    let mut stack: Vec<String> = Vec::new();
    let mut field: Option<Field> = None;
    let mut value = String::new();
    let mut initial_creator = None;
    let mut creator = None;
    let mut metadata = DocumentMetadata::default();

    for notification in part.notifications() {
        match notification? {
            Notification::Open { name, .. } => {
                let in_meta = stack.last().is_some_and(|parent| parent == "office:meta");
                field = if in_meta { Field::from_name(&name) } else { None };
                value.clear();
                stack.push(name);
            },
            Notification::Text(text) => {
                if field.is_some() {
                    value.push_str(&text);
                }
            },
            Notification::Close { .. } => {
                stack.pop();
                if let Some(current) = field.take() {
                    let trimmed = value.trim();
                    let captured = (!trimmed.is_empty()).then(|| trimmed.to_string());
                    match current {
                        Field::Title => metadata.title = captured,
                        Field::InitialCreator => initial_creator = captured,
                        Field::Creator => creator = captured,
                        Field::Description => metadata.description = captured,
                    }
                }
            },
        }
    }

    metadata.author = initial_creator.or(creator);
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(body: &str) -> XmlPart {
        XmlPart::from_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-meta xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
  xmlns:dc="http://purl.org/dc/elements/1.1/"
  xmlns:meta="urn:oasis:names:tc:opendocument:xmlns:meta:1.0">
<office:meta>{}</office:meta>
</office:document-meta>"#,
            body
        ))
    }

    #[test]
    fn test_parse_all_fields() {
        let part = meta(
            "<meta:generator>LibreOffice</meta:generator>\
             <dc:title>The Novel</dc:title>\
             <dc:description>A story &amp; more</dc:description>\
             <meta:initial-creator>Jane Roe</meta:initial-creator>\
             <dc:creator>Editor</dc:creator>",
        );
        let metadata = parse_metadata(&part).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("The Novel"));
        assert_eq!(metadata.description.as_deref(), Some("A story & more"));
        assert_eq!(metadata.author.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn test_creator_fallback_and_blank_values() {
        let part = meta("<dc:title>   </dc:title><dc:creator>Editor</dc:creator>");
        let metadata = parse_metadata(&part).unwrap();
        assert_eq!(metadata.title, None);
        assert_eq!(metadata.author.as_deref(), Some("Editor"));
        assert_eq!(metadata.description, None);
    }

    #[test]
    fn test_no_meta_element() {
        let part = XmlPart::from_string("<office:document-meta/>");
        let metadata = parse_metadata(&part).unwrap();
        assert!(!metadata.has_data());
    }
}
