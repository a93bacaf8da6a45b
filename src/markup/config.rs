/// Configuration types for bracket markup encoding.
///
/// This module defines the options that control how yWriter bracket markup
/// is turned into ODT paragraph XML: which language tags are recognized,
/// who authored inline comments, and which paragraph styles are referenced.
use crate::common::xml::escape_xml;
use crate::odf::constants::{
    EMPHASIS_STYLE, FIRST_LINE_INDENT_STYLE, LANGUAGE_STYLE_PREFIX, NO_COUNTRY, QUOTATIONS_STYLE,
    STRONG_EMPHASIS_STYLE, TEXT_BODY_STYLE,
};
use crate::odf::odt::Language;
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;

/// Configuration options for markup encoding.
///
/// # Examples
///
/// ```rust
/// use ywodt::markup::EncoderOptions;
///
/// // Create with defaults
/// let options = EncoderOptions::default();
///
/// // Or customize
/// let options = EncoderOptions::new()
///     .with_languages(["de-CH", "fr"])
///     .with_author("Jane Roe")
///     .with_strip_unsupported(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Declared document languages, in declaration order
    pub languages: Vec<String>,
    /// Author credited in inline comment annotations
    pub author: String,
    /// Style of the first paragraph and of paragraphs after a blank line
    pub body_style: String,
    /// Style of paragraphs continuing a run of paragraphs
    pub indent_style: String,
    /// Style of block quotation paragraphs (`> ` lines)
    pub quotations_style: String,
    /// Whether unsupported formatting tags (`[h1]`, `[c]`, `[r]`, `[s]`, `[u]`) are removed
    pub strip_unsupported: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            author: String::new(),
            body_style: TEXT_BODY_STYLE.to_string(),
            indent_style: FIRST_LINE_INDENT_STYLE.to_string(),
            quotations_style: QUOTATIONS_STYLE.to_string(),
            strip_unsupported: true,
        }
    }
}

impl EncoderOptions {
    /// Create a new `EncoderOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declared document languages.
    ///
    /// Each language code `xx` makes `[lang=xx]`/`[/lang=xx]` a recognized
    /// tag pair.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the author credited in comment annotations.
    #[inline]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the body, first-line-indent and quotation paragraph styles.
    pub fn with_paragraph_styles(
        mut self,
        body: impl Into<String>,
        indent: impl Into<String>,
        quotations: impl Into<String>,
    ) -> Self {
        self.body_style = body.into();
        self.indent_style = indent.into();
        self.quotations_style = quotations.into();
        self
    }

    /// Set whether unsupported formatting tags are removed.
    #[inline]
    pub fn with_strip_unsupported(mut self, strip: bool) -> Self {
        self.strip_unsupported = strip;
        self
    }

    /// Character style referenced by `[lang=xx]` spans: `T1`, `T2`, ...
    /// in declaration order.
    pub fn language_style_name(&self, language: &str) -> Option<String> {
        self.languages
            .iter()
            .position(|l| l == language)
            .map(|index| format!("{}{}", LANGUAGE_STYLE_PREFIX, index + 1))
    }

    /// Automatic style declarations for the declared languages.
    ///
    /// Place these in the document's `office:automatic-styles` so the
    /// encoder's language spans resolve.
    pub fn language_styles(&self) -> String {
        let mut xml = String::new();
        for (index, locale) in self.languages.iter().enumerate() {
            let language = Language::from_locale(locale);
            let _ = write!(
                xml,
                r#"<style:style style:name="{}{}" style:family="text"><style:text-properties fo:language="{}" fo:country="{}"/></style:style>"#,
                LANGUAGE_STYLE_PREFIX,
                index + 1,
                escape_xml(&language.code),
                escape_xml(language.country.as_deref().unwrap_or(NO_COUNTRY)),
            );
        }
        xml
    }

    /// Common character style declarations for emphasis and strong emphasis.
    pub fn character_styles(&self) -> String {
        format!(
            r#"<style:style style:name="{}" style:family="text"><style:text-properties fo:font-style="italic"/></style:style><style:style style:name="{}" style:display-name="Strong Emphasis" style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>"#,
            EMPHASIS_STYLE, STRONG_EMPHASIS_STYLE
        )
    }
}
