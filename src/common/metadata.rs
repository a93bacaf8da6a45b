/// Document metadata carried in the decoder preamble.
///
/// The decoder only forwards these values; it never interprets them.
use serde::{Deserialize, Serialize};

/// Descriptive metadata of one document.
///
/// Populated from the optional metadata part. Every field is optional and an
/// empty value is the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author (initial creator, falling back to the last editor)
    pub author: Option<String>,
    /// Document description
    pub description: Option<String>,
}

impl DocumentMetadata {
    /// Check if the metadata contains any actual data.
    ///
    /// Returns true if at least one field is populated.
    pub fn has_data(&self) -> bool {
        self.title.is_some() || self.author.is_some() || self.description.is_some()
    }

    /// Iterate the populated fields in preamble order, paired with the tag
    /// name each one is emitted under.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("title", self.title.as_deref()),
            ("author", self.author.as_deref()),
            ("description", self.description.as_deref()),
        ]
        .into_iter()
        .filter_map(|(tag, value)| value.map(|v| (tag, v)))
    }
}

/// Default paragraph language declared by the style document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLocale {
    /// ISO 639 language code, e.g. `en`
    pub language: Option<String>,
    /// ISO 3166 country code, e.g. `US`
    pub country: Option<String>,
}
