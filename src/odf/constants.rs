//! ODF constants: part paths, style names and attribute names.
//!
//! Style names use the ODF encoding of spaces as `_20_`, the way word
//! processors write them into `styles.xml`.

/// MIME type for OpenDocument Text (.odt)
pub const ODF_TEXT: &str = "application/vnd.oasis.opendocument.text";

// ============================================================================
// PACKAGE PARTS
// ============================================================================

/// Main document content
pub const CONTENT_PART: &str = "content.xml";

/// Document-wide style declarations
pub const STYLES_PART: &str = "styles.xml";

/// Document metadata
pub const META_PART: &str = "meta.xml";

/// Package MIME type entry
pub const MIMETYPE_PART: &str = "mimetype";

// ============================================================================
// STYLE NAMES
// ============================================================================

/// Prefix shared by the heading paragraph style family
pub const HEADING_FAMILY_PREFIX: &str = "Heading";

/// Parent style name of block quotation paragraphs
pub const QUOTATIONS_STYLE: &str = "Quotations";

/// Body paragraph without first-line indent
pub const TEXT_BODY_STYLE: &str = "Text_20_body";

/// Body paragraph continuing a run of paragraphs
pub const FIRST_LINE_INDENT_STYLE: &str = "First_20_line_20_indent";

/// Character style for emphasis
pub const EMPHASIS_STYLE: &str = "Emphasis";

/// Character style for strong emphasis
pub const STRONG_EMPHASIS_STYLE: &str = "Strong_20_Emphasis";

/// Prefix of the automatic character styles generated per declared language
pub const LANGUAGE_STYLE_PREFIX: &str = "T";

/// Country value meaning "no country"
pub const NO_COUNTRY: &str = "none";

// ============================================================================
// ATTRIBUTES
// ============================================================================

pub const ATTR_STYLE_NAME: &[u8] = b"style:name";
pub const ATTR_STYLE_FAMILY: &[u8] = b"style:family";
pub const ATTR_PARENT_STYLE_NAME: &[u8] = b"style:parent-style-name";
pub const ATTR_TEXT_STYLE_NAME: &[u8] = b"text:style-name";
pub const ATTR_OUTLINE_LEVEL: &[u8] = b"text:outline-level";
pub const ATTR_SECTION_NAME: &[u8] = b"text:name";
pub const ATTR_SPACE_COUNT: &[u8] = b"text:c";
pub const ATTR_FONT_STYLE: &[u8] = b"fo:font-style";
pub const ATTR_FONT_WEIGHT: &[u8] = b"fo:font-weight";
pub const ATTR_LANGUAGE: &[u8] = b"fo:language";
pub const ATTR_COUNTRY: &[u8] = b"fo:country";

/// Maximum heading level the format can express
pub const MAX_HEADING_LEVEL: u8 = 10;

/// Largest `text:c` space count expanded; larger counts are clamped
pub const MAX_SPACE_COUNT: usize = 1024;

/// Parse the heading level from the trailing digits of a style name.
///
/// `Heading_20_2` yields 2 and `Heading_20_10` yields 10. Names without
/// trailing digits, or with a level outside `1..=10`, yield `None`.
pub fn trailing_heading_level(name: &str) -> Option<u8> {
    let digits = name
        .bytes()
        .rev()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    let level: u8 = name[name.len() - digits..].parse().ok()?;
    (1..=MAX_HEADING_LEVEL).contains(&level).then_some(level)
}

/// Whether a style name belongs to the heading family.
#[inline]
pub fn is_heading_family(name: &str) -> bool {
    name.starts_with(HEADING_FAMILY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_heading_level() {
        assert_eq!(trailing_heading_level("Heading_20_1"), Some(1));
        assert_eq!(trailing_heading_level("Heading_20_2"), Some(2));
        assert_eq!(trailing_heading_level("Heading_20_10"), Some(10));
        assert_eq!(trailing_heading_level("Heading"), None);
        assert_eq!(trailing_heading_level("Heading_20_0"), None);
        assert_eq!(trailing_heading_level("Heading_20_11"), None);
        assert_eq!(trailing_heading_level(""), None);
    }

    #[test]
    fn test_heading_family() {
        assert!(is_heading_family("Heading_20_3"));
        assert!(is_heading_family("Heading"));
        assert!(!is_heading_family("Text_20_body"));
    }
}
