//! ODF XML tag matching for the decoder's dispatch.
//!
//! Notifications carry qualified element names (`text:p`). The decoder only
//! reacts to a small set of them; everything else maps to `OdfTag::Unknown`
//! and is tracked for balance only.
//!
//! # Performance Optimizations
//!
//! - **Compile-time tag hashing**: Uses `phf` for O(1) tag lookups
//! - **Zero allocations**: All tag comparisons are done on borrowed slices
use phf::{Map, phf_map};

// ============================================================================
// TAG TYPE ENUMERATION
// ============================================================================

/// ODF XML tag types for fast dispatch
///
/// Using enums instead of strings enables dispatch via match expressions
/// instead of string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OdfTag {
    // Paragraph family
    TextP,
    TextH,

    // Inline elements
    TextSpan,
    TextS,
    TextTab,
    TextLineBreak,

    // Structure
    TextSection,
    TextListItem,
    OfficeAnnotation,

    // Style declarations
    StyleStyle,
    StyleDefaultStyle,
    StyleTextProperties,

    // Unknown/unsupported tag
    Unknown,
}

impl OdfTag {
    /// Whether the tag opens a paragraph-family element.
    #[inline]
    pub fn is_paragraph(self) -> bool {
        matches!(self, OdfTag::TextP | OdfTag::TextH)
    }

    /// Whether the tag expands to whitespace text.
    #[inline]
    pub fn is_whitespace(self) -> bool {
        matches!(self, OdfTag::TextS | OdfTag::TextTab | OdfTag::TextLineBreak)
    }
}

// ============================================================================
// COMPILE-TIME TAG MAPPING
// ============================================================================

/// Tag string to OdfTag enum mapping (compile-time perfect hash map)
static TAG_MAP: Map<&'static [u8], OdfTag> = phf_map! {
    b"text:p" => OdfTag::TextP,
    b"text:h" => OdfTag::TextH,
    b"text:span" => OdfTag::TextSpan,
    b"text:s" => OdfTag::TextS,
    b"text:tab" => OdfTag::TextTab,
    b"text:line-break" => OdfTag::TextLineBreak,
    b"text:section" => OdfTag::TextSection,
    b"text:list-item" => OdfTag::TextListItem,
    b"office:annotation" => OdfTag::OfficeAnnotation,
    b"style:style" => OdfTag::StyleStyle,
    b"style:default-style" => OdfTag::StyleDefaultStyle,
    b"style:text-properties" => OdfTag::StyleTextProperties,
};

/// Match a tag to its OdfTag enum variant
///
/// For unknown tags, returns `OdfTag::Unknown`.
///
/// # Examples
///
/// ```
/// # use ywodt::odf::elements::tag_matcher::{match_tag, OdfTag};
/// assert_eq!(match_tag(b"text:p"), OdfTag::TextP);
/// assert_eq!(match_tag(b"office:annotation"), OdfTag::OfficeAnnotation);
/// assert_eq!(match_tag(b"table:table"), OdfTag::Unknown);
/// ```
#[inline(always)]
pub fn match_tag(tag: &[u8]) -> OdfTag {
    TAG_MAP.get(tag).copied().unwrap_or(OdfTag::Unknown)
}
