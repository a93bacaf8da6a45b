//! Style table: style identifiers resolved to semantic roles.
//!
//! ODF separates a style's name and parent (`style:style`) from its character
//! properties (`style:text-properties`, a child element). The table therefore
//! accumulates role fragments per style as those notifications arrive, and
//! resolves them on lookup. Lookups never fail: an unknown style simply has
//! no special meaning.

use crate::common::DocumentLocale;
use crate::odf::constants::{
    ATTR_COUNTRY, ATTR_FONT_STYLE, ATTR_FONT_WEIGHT, ATTR_LANGUAGE, ATTR_PARENT_STYLE_NAME,
    ATTR_STYLE_FAMILY, ATTR_STYLE_NAME, NO_COUNTRY, QUOTATIONS_STYLE, is_heading_family,
    trailing_heading_level,
};
use crate::odf::core::Attributes;
use crate::odf::elements::tag_matcher::OdfTag;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// A language run, e.g. `de` or `de-DE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    /// ISO 639 language code
    pub code: String,
    /// ISO 3166 country code; `None` when the document says `none`
    pub country: Option<String>,
}

impl Language {
    /// Create a language, treating the country value `none` as absent.
    pub fn new(code: &str, country: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            country: country
                .filter(|c| !c.is_empty() && *c != NO_COUNTRY)
                .map(str::to_string),
        }
    }

    /// Parse a locale such as `de-DE` or `fr`.
    pub fn from_locale(locale: &str) -> Self {
        match locale.split_once('-') {
            Some((code, country)) => Self::new(code, Some(country)),
            None => Self::new(locale, None),
        }
    }

    /// `code-country`, or the bare code without a country.
    pub fn locale(&self) -> String {
        match &self.country {
            Some(country) => format!("{}-{}", self.code, country),
            None => self.code.clone(),
        }
    }

    /// Structural tag name of a span in this language.
    pub fn tag_name(&self) -> String {
        format!("lang_{}", self.locale())
    }
}

/// Semantic role of a style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleRole {
    /// Heading of the given level (1..=10)
    Heading(u8),
    /// Block quotation paragraph
    Blockquote,
    /// Italic span
    Emphasis,
    /// Bold span
    StrongEmphasis,
    /// Language run
    Language(Language),
    /// No special meaning
    PlainParagraph,
}

impl StyleRole {
    /// Name of the structural tag this role opens.
    pub fn tag_name(&self) -> String {
        match self {
            StyleRole::Heading(level) => format!("h{}", level),
            StyleRole::Blockquote => "blockquote".to_string(),
            StyleRole::Emphasis => "em".to_string(),
            StyleRole::StrongEmphasis => "strong".to_string(),
            StyleRole::Language(language) => language.tag_name(),
            StyleRole::PlainParagraph => "p".to_string(),
        }
    }
}

/// Block-level role derived from the parent style name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockRole {
    Heading(u8),
    Blockquote,
}

/// Role fragments accumulated for one style identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StyleEntry {
    block: Option<BlockRole>,
    emphasis: bool,
    strong: bool,
    language: Option<Language>,
}

/// One `style:text-properties` application.
///
/// `None` leaves an axis untouched; `Some` overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextProperties {
    pub italic: Option<bool>,
    pub bold: Option<bool>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl TextProperties {
    /// Read the properties the table cares about from element attributes.
    pub fn from_attributes(attributes: &Attributes) -> Self {
        let italic = attributes
            .get(ATTR_FONT_STYLE)
            .map(|style| matches!(style, "italic" | "oblique"));
        let bold = attributes.get(ATTR_FONT_WEIGHT).map(is_bold_weight);
        Self {
            italic,
            bold,
            language: attributes.get(ATTR_LANGUAGE).map(str::to_string),
            country: attributes.get(ATTR_COUNTRY).map(str::to_string),
        }
    }
}

/// `bold`, or a numeric weight of 600 and above
fn is_bold_weight(weight: &str) -> bool {
    match weight {
        "bold" => true,
        other => other.parse::<u16>().is_ok_and(|w| w >= 600),
    }
}

/// Mapping from style identifier to its accumulated role.
///
/// Created fresh for each decode pass.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    entries: HashMap<String, StyleEntry>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a style declaration and its parent style name.
    ///
    /// A parent in the heading family yields `Heading(level)` when the parent
    /// name ends in a level; the quotations parent yields `Blockquote`.
    /// Anything else leaves the style pending its text properties.
    pub fn declare_style(&mut self, id: &str, parent_name: Option<&str>) {
        let entry = self.entries.entry(id.to_string()).or_default();
        let Some(parent) = parent_name else {
            return;
        };
        if is_heading_family(parent) {
            match trailing_heading_level(parent) {
                Some(level) => entry.block = Some(BlockRole::Heading(level)),
                None => log::trace!("Style {:?}: heading parent {:?} has no level", id, parent),
            }
        } else if parent == QUOTATIONS_STYLE {
            entry.block = Some(BlockRole::Blockquote);
        }
    }

    /// Refine a style with one text-properties application.
    pub fn apply_text_properties(&mut self, id: &str, properties: &TextProperties) {
        let entry = self.entries.entry(id.to_string()).or_default();
        if let Some(italic) = properties.italic {
            entry.emphasis = italic;
        }
        if let Some(bold) = properties.bold {
            entry.strong = bold;
        }
        if let Some(code) = properties.language.as_deref() {
            entry.language = (!code.is_empty() && code != NO_COUNTRY)
                .then(|| Language::new(code, properties.country.as_deref()));
        }
    }

    /// Primary role of a style.
    ///
    /// Block roles take precedence over inline roles, and the language over
    /// emphasis. Unknown or role-less styles resolve to `PlainParagraph`.
    pub fn resolve(&self, id: &str) -> StyleRole {
        let Some(entry) = self.entries.get(id) else {
            return StyleRole::PlainParagraph;
        };
        match entry.block {
            Some(BlockRole::Heading(level)) => StyleRole::Heading(level),
            Some(BlockRole::Blockquote) => StyleRole::Blockquote,
            None => self
                .span_roles(id)
                .into_iter()
                .next()
                .unwrap_or(StyleRole::PlainParagraph),
        }
    }

    /// Inline roles of a style in span open order: language outermost, then
    /// emphasis, then strong emphasis.
    pub fn span_roles(&self, id: &str) -> SmallVec<[StyleRole; 3]> {
        let mut roles = SmallVec::new();
        if let Some(entry) = self.entries.get(id) {
            if let Some(language) = &entry.language {
                roles.push(StyleRole::Language(language.clone()));
            }
            if entry.emphasis {
                roles.push(StyleRole::Emphasis);
            }
            if entry.strong {
                roles.push(StyleRole::StrongEmphasis);
            }
        }
        roles
    }

    /// Language carried by a style, if any.
    pub fn language(&self, id: &str) -> Option<&Language> {
        self.entries.get(id).and_then(|entry| entry.language.as_ref())
    }

    /// Whether the style has been declared.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the currently open style element declares
#[derive(Debug, Clone, PartialEq, Eq)]
enum Declaring {
    Named(String),
    DefaultParagraph,
    Other,
}

/// Feeds style-declaration notifications into a [`StyleTable`].
///
/// Handles `style:style`, `style:default-style` and their
/// `style:text-properties` children, wherever they appear (the style
/// document or the content's automatic styles).
#[derive(Debug, Clone, Default)]
pub struct StyleCollector {
    declaring: Option<Declaring>,
    locale: DocumentLocale,
    locale_seen: bool,
}

impl StyleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe an element open. Returns `true` if the element was a style
    /// declaration element.
    pub fn on_open(&mut self, table: &mut StyleTable, tag: OdfTag, attributes: &Attributes) -> bool {
        match tag {
            OdfTag::StyleStyle => {
                self.declaring = Some(match attributes.get(ATTR_STYLE_NAME) {
                    Some(id) => {
                        table.declare_style(id, attributes.get(ATTR_PARENT_STYLE_NAME));
                        Declaring::Named(id.to_string())
                    },
                    None => Declaring::Other,
                });
                true
            },
            OdfTag::StyleDefaultStyle => {
                self.declaring = Some(if attributes.get(ATTR_STYLE_FAMILY) == Some("paragraph") {
                    Declaring::DefaultParagraph
                } else {
                    Declaring::Other
                });
                true
            },
            OdfTag::StyleTextProperties => {
                match &self.declaring {
                    Some(Declaring::Named(id)) => {
                        table.apply_text_properties(id, &TextProperties::from_attributes(attributes));
                    },
                    Some(Declaring::DefaultParagraph) if !self.locale_seen => {
                        self.locale = DocumentLocale {
                            language: attributes.get(ATTR_LANGUAGE).map(str::to_string),
                            country: attributes
                                .get(ATTR_COUNTRY)
                                .filter(|c| !c.is_empty() && *c != NO_COUNTRY)
                                .map(str::to_string),
                        };
                        self.locale_seen = true;
                    },
                    _ => {},
                }
                true
            },
            _ => false,
        }
    }

    /// Observe an element close.
    pub fn on_close(&mut self, tag: OdfTag) {
        if matches!(tag, OdfTag::StyleStyle | OdfTag::StyleDefaultStyle) {
            self.declaring = None;
        }
    }

    /// Default paragraph language, from the first paragraph default style.
    pub fn locale(&self) -> &DocumentLocale {
        &self.locale
    }
}
