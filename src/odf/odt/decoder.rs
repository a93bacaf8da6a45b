//! Structural decoder: flat ODF notifications to structural events.
//!
//! The decoder is a finite-state machine advanced one [`Notification`] at a
//! time. Each notification yields zero or more [`StructuralEvent`]s, appended
//! to the caller's buffer in document order. All state (style table, span
//! stack, mode) belongs to one decode pass; create a new decoder per
//! document.
//!
//! # Paragraph resolution
//!
//! A `text:p`/`text:h` open is resolved in this priority order:
//!
//! 1. inside an annotation: counted, nothing emitted
//! 2. blockquote style: `blockquote`
//! 3. heading (parent family, own style name, or `text:outline-level`): `hN`
//! 4. inside a list item: `li`
//! 5. otherwise: `p`
//!
//! The tag opened is remembered and closed at the matching paragraph close;
//! close notifications carry no style information.

use super::comment::CommentCapture;
use super::event::StructuralEvent;
use super::spans::{SpanStack, SpanTags};
use super::styles::{StyleCollector, StyleRole, StyleTable};
use crate::common::{DocumentLocale, Error, Result};
use crate::odf::constants::{
    ATTR_OUTLINE_LEVEL, ATTR_SECTION_NAME, ATTR_SPACE_COUNT, ATTR_TEXT_STYLE_NAME,
    MAX_HEADING_LEVEL, MAX_SPACE_COUNT, QUOTATIONS_STYLE, is_heading_family, trailing_heading_level,
};
use crate::odf::core::{Attributes, Notification, XmlPart};
use crate::odf::elements::tag_matcher::{OdfTag, match_tag};
use serde::{Deserialize, Serialize};

/// Decoder behavior switches.
///
/// # Examples
///
/// ```rust
/// use ywodt::DecoderOptions;
///
/// let options = DecoderOptions::new()
///     .with_whitespace_expansion(false)
///     .with_preamble(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderOptions {
    /// Expand `text:s`, `text:tab` and `text:line-break` to whitespace text
    pub expand_whitespace: bool,
    /// Emit the language/metadata preamble before content events
    pub emit_preamble: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            expand_whitespace: true,
            emit_preamble: true,
        }
    }
}

impl DecoderOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether whitespace elements become text.
    #[inline]
    pub fn with_whitespace_expansion(mut self, expand: bool) -> Self {
        self.expand_whitespace = expand;
        self
    }

    /// Set whether the preamble is emitted.
    #[inline]
    pub fn with_preamble(mut self, emit: bool) -> Self {
        self.emit_preamble = emit;
        self
    }
}

/// Block context of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserMode {
    /// Between blocks; character data is dropped
    #[default]
    Normal,
    /// Inside a plain paragraph
    InParagraph,
    /// Inside a heading of the given level
    InHeading(u8),
    /// Inside a block quotation paragraph
    InBlockquote,
    /// Inside a paragraph rendered as a list item
    InListItem,
    /// Inside an annotation, with the number of its paragraphs opened so far
    InCommentCapture(u32),
}

impl ParserMode {
    /// Tag opened for this block mode, if it is a text block
    fn block_tag(self) -> Option<String> {
        match self {
            ParserMode::InParagraph => Some("p".to_string()),
            ParserMode::InHeading(level) => Some(format!("h{}", level)),
            ParserMode::InBlockquote => Some("blockquote".to_string()),
            ParserMode::InListItem => Some("li".to_string()),
            ParserMode::Normal | ParserMode::InCommentCapture(_) => None,
        }
    }

    /// Whether character data is forwarded in this mode
    #[inline]
    pub fn is_text_context(self) -> bool {
        self.block_tag().is_some()
    }
}

/// Streaming structural decoder for one document.
#[derive(Debug, Default)]
pub struct StructuralDecoder {
    options: DecoderOptions,
    styles: StyleTable,
    collector: StyleCollector,
    spans: SpanStack,
    mode: ParserMode,
    /// Modes to restore at each open paragraph's close
    blocks: Vec<ParserMode>,
    capture: CommentCapture,
    list_items: usize,
    open_elements: Vec<String>,
}

impl StructuralDecoder {
    /// Create a decoder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given options
    pub fn with_options(options: DecoderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Seed the style table from a style document.
    ///
    /// Only style declarations are observed; nothing is emitted.
    pub fn seed_styles(&mut self, styles: &XmlPart) -> Result<()> {
        for notification in styles.notifications() {
            match notification? {
                Notification::Open { name, attributes } => {
                    self.collector
                        .on_open(&mut self.styles, match_tag(name.as_bytes()), &attributes);
                },
                Notification::Close { name } => self.collector.on_close(match_tag(name.as_bytes())),
                Notification::Text(_) => {},
            }
        }
        log::debug!("Seeded {} styles", self.styles.len());
        Ok(())
    }

    /// Style table built so far
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Default paragraph language seen in style declarations
    pub fn locale(&self) -> &DocumentLocale {
        self.collector.locale()
    }

    /// Current block mode
    pub fn mode(&self) -> ParserMode {
        self.mode
    }

    /// Currently open span tags, outermost first
    pub fn open_spans(&self) -> &[String] {
        self.spans.tags()
    }

    /// Advance by one notification, appending the resulting events to `out`.
    ///
    /// Fails with [`Error::MalformedStructure`] when a close does not match
    /// the innermost open element.
    pub fn feed(&mut self, notification: &Notification, out: &mut Vec<StructuralEvent>) -> Result<()> {
        match notification {
            Notification::Open { name, attributes } => {
                self.open_elements.push(name.clone());
                self.on_open(match_tag(name.as_bytes()), attributes, out);
                Ok(())
            },
            Notification::Close { name } => {
                match self.open_elements.pop() {
                    Some(open) if open == *name => {},
                    Some(open) => return Err(Error::unmatched_close(name, Some(&open))),
                    None => return Err(Error::unmatched_close(name, None)),
                }
                self.on_close(match_tag(name.as_bytes()), out)
            },
            Notification::Text(text) => {
                self.on_text(text, out);
                Ok(())
            },
        }
    }

    /// Decode a whole notification stream.
    ///
    /// No events are returned when the stream is malformed.
    pub fn decode<I>(mut self, notifications: I) -> Result<Vec<StructuralEvent>>
    where
        I: IntoIterator<Item = Result<Notification>>,
    {
        let mut events = Vec::new();
        for notification in notifications {
            self.feed(&notification?, &mut events)?;
        }
        self.finish()?;
        Ok(events)
    }

    /// Check that the stream ended with every element closed.
    pub fn finish(self) -> Result<()> {
        match self.open_elements.last() {
            Some(open) => Err(Error::MalformedStructure(format!(
                "<{}> is still open at end of document",
                open
            ))),
            None => Ok(()),
        }
    }

    fn on_open(&mut self, tag: OdfTag, attributes: &Attributes, out: &mut Vec<StructuralEvent>) {
        if self.collector.on_open(&mut self.styles, tag, attributes) {
            return;
        }
        match tag {
            tag if tag.is_paragraph() => self.open_paragraph(tag, attributes, out),
            OdfTag::TextSpan => self.open_span(attributes, out),
            OdfTag::TextSection => {
                let mut div = Attributes::new();
                div.push("id", attributes.get(ATTR_SECTION_NAME).unwrap_or_default());
                out.push(StructuralEvent::open_with("div", div));
            },
            OdfTag::TextListItem => self.list_items += 1,
            OdfTag::OfficeAnnotation => {
                let was_capturing = self.capture.is_active();
                self.capture.begin(self.mode);
                if !was_capturing {
                    self.set_mode(ParserMode::InCommentCapture(0));
                }
            },
            tag if tag.is_whitespace() && self.options.expand_whitespace => {
                self.expand_whitespace(tag, attributes, out)
            },
            _ => {},
        }
    }

    fn expand_whitespace(&mut self, tag: OdfTag, attributes: &Attributes, out: &mut Vec<StructuralEvent>) {
        match tag {
            OdfTag::TextS => {
                let count = attributes
                    .get(ATTR_SPACE_COUNT)
                    .and_then(|c| c.trim().parse::<u64>().ok())
                    .unwrap_or(1);
                let count = if count > MAX_SPACE_COUNT as u64 {
                    log::warn!("Space count {} clamped to {}", count, MAX_SPACE_COUNT);
                    MAX_SPACE_COUNT
                } else {
                    count as usize
                };
                self.on_text(&" ".repeat(count), out);
            },
            OdfTag::TextTab => self.on_text("\t", out),
            _ => self.on_text("\n", out),
        }
    }

    fn on_close(&mut self, tag: OdfTag, out: &mut Vec<StructuralEvent>) -> Result<()> {
        match tag {
            OdfTag::StyleStyle | OdfTag::StyleDefaultStyle => self.collector.on_close(tag),
            tag if tag.is_paragraph() => self.close_paragraph(out)?,
            OdfTag::TextSpan => {
                for name in self.spans.close()? {
                    out.push(StructuralEvent::close(name));
                }
            },
            OdfTag::TextSection => out.push(StructuralEvent::close("div")),
            OdfTag::TextListItem => self.list_items = self.list_items.saturating_sub(1),
            OdfTag::OfficeAnnotation => {
                if let Some((body, resume)) = self.capture.end() {
                    out.push(StructuralEvent::comment(body));
                    self.set_mode(resume);
                }
            },
            _ => {},
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str, out: &mut Vec<StructuralEvent>) {
        match self.mode {
            ParserMode::InCommentCapture(paragraphs) => self.capture.accept(paragraphs, text),
            mode if mode.is_text_context() => out.push(StructuralEvent::text(text)),
            _ => {},
        }
    }

    fn open_paragraph(&mut self, tag: OdfTag, attributes: &Attributes, out: &mut Vec<StructuralEvent>) {
        if let ParserMode::InCommentCapture(paragraphs) = self.mode {
            self.mode = ParserMode::InCommentCapture(paragraphs + 1);
            return;
        }

        let style = attributes.get(ATTR_TEXT_STYLE_NAME).unwrap_or_default();
        let role = self.styles.resolve(style);
        let mut forwarded = Attributes::new();

        let mode = if role == StyleRole::Blockquote || style == QUOTATIONS_STYLE {
            forwarded.push("class", "quotations");
            ParserMode::InBlockquote
        } else if let Some(level) = self.heading_level(tag, style, &role, attributes) {
            ParserMode::InHeading(level)
        } else if self.list_items > 0 {
            ParserMode::InListItem
        } else {
            ParserMode::InParagraph
        };
        if let Some(language) = self.styles.language(style) {
            forwarded.push("lang", language.locale());
        }

        self.blocks.push(self.mode);
        self.set_mode(mode);
        if let Some(name) = mode.block_tag() {
            out.push(StructuralEvent::open_with(name, forwarded));
        }
    }

    fn heading_level(&self, tag: OdfTag, style: &str, role: &StyleRole, attributes: &Attributes) -> Option<u8> {
        if tag == OdfTag::TextH
            && let Some(level) = attributes
                .get(ATTR_OUTLINE_LEVEL)
                .and_then(|l| l.parse::<u8>().ok())
                .filter(|l| (1..=MAX_HEADING_LEVEL).contains(l))
        {
            return Some(level);
        }
        let level = match role {
            StyleRole::Heading(level) => Some(*level),
            _ if is_heading_family(style) => trailing_heading_level(style),
            _ => None,
        };
        match level {
            None if tag == OdfTag::TextH => {
                log::warn!("Heading with style {:?} has no level, using 1", style);
                Some(1)
            },
            level => level,
        }
    }

    fn close_paragraph(&mut self, out: &mut Vec<StructuralEvent>) -> Result<()> {
        if matches!(self.mode, ParserMode::InCommentCapture(_)) {
            return Ok(());
        }
        let name = self.mode.block_tag().ok_or_else(|| {
            Error::MalformedStructure("paragraph close outside a paragraph".to_string())
        })?;
        out.push(StructuralEvent::close(name));
        let previous = self.blocks.pop().unwrap_or_default();
        self.set_mode(previous);
        Ok(())
    }

    fn open_span(&mut self, attributes: &Attributes, out: &mut Vec<StructuralEvent>) {
        if matches!(self.mode, ParserMode::InCommentCapture(_)) {
            self.spans.open(SpanTags::new());
            return;
        }
        let style = attributes.get(ATTR_TEXT_STYLE_NAME).unwrap_or_default();
        if !style.is_empty() && !self.styles.contains(style) {
            log::trace!("Span style {:?} is not declared", style);
        }
        let tags: SpanTags = self
            .styles
            .span_roles(style)
            .iter()
            .map(StyleRole::tag_name)
            .collect();
        for name in &tags {
            out.push(StructuralEvent::open(name.clone()));
        }
        self.spans.open(tags);
    }

    fn set_mode(&mut self, mode: ParserMode) {
        if self.mode != mode {
            log::trace!("Decoder mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}
