/// Bracket markup to ODT paragraph XML.
///
/// This module provides the `OdtWriter` struct which turns balanced markup
/// runs into `text:p` elements with nested `text:span` formatting and inline
/// `office:annotation` comments.
use super::balance::{
    BracketTag, COMMENT_END, COMMENT_START, MarkupRun, QUOTE_MARKER, balance_lines, recognized_tags,
};
use super::config::EncoderOptions;
use crate::common::xml::escape_text;
use crate::odf::constants::{EMPHASIS_STYLE, STRONG_EMPHASIS_STYLE};
use memchr::memchr2;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as FmtWrite;

// Headings, alignment, strikethrough and underline have no span equivalent
static UNSUPPORTED_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[/?[hcrsu]\d*\]").expect("Failed to build unsupported tag pattern"));

/// A markup token recognized at some position in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Open(usize),
    Close(usize),
    Comment,
}

/// Low-level writer for ODT paragraph generation.
pub(crate) struct OdtWriter<'a> {
    /// The output buffer
    buffer: String,
    options: &'a EncoderOptions,
    tags: Vec<BracketTag>,
    /// Character style per recognized tag, parallel to `tags`
    span_styles: Vec<String>,
    /// Indices of currently open spans, outermost first
    open: Vec<usize>,
}

impl<'a> OdtWriter<'a> {
    /// Create a new writer with the given options.
    pub fn new(options: &'a EncoderOptions) -> Self {
        let tags = recognized_tags(&options.languages);
        let span_styles = tags
            .iter()
            .map(|tag| match tag.name.as_str() {
                "i" => EMPHASIS_STYLE.to_string(),
                "b" => STRONG_EMPHASIS_STYLE.to_string(),
                name => name
                    .strip_prefix("lang=")
                    .and_then(|code| options.language_style_name(code))
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            buffer: String::with_capacity(4096),
            options,
            tags,
            span_styles,
            open: Vec::new(),
        }
    }

    /// Encode a whole text block.
    pub fn write_block(&mut self, text: &str) {
        let options = self.options;
        let text = if options.strip_unsupported {
            UNSUPPORTED_TAGS.replace_all(text, "")
        } else {
            text.into()
        };
        if text.trim().is_empty() {
            return;
        }
        let text = trim_trailing_blank_lines(&text);

        let runs = balance_lines(text, &self.tags);
        // The first paragraph and any paragraph after a blank line start a run
        let mut starts_run = true;
        for (index, run) in runs.iter().enumerate() {
            if index > 0 {
                self.buffer.push('\n');
            }
            if run.text.trim().is_empty() {
                self.write_empty_paragraph(&options.body_style);
                starts_run = true;
                continue;
            }

            let style = if run.is_quotation() {
                &options.quotations_style
            } else if starts_run {
                &options.body_style
            } else {
                &options.indent_style
            };
            // A quotation interrupts the paragraph run
            starts_run = run.is_quotation();
            self.write_paragraph(run, style);
        }
        log::debug!("Encoded {} lines into {} bytes of XML", runs.len(), self.buffer.len());
    }

    fn write_empty_paragraph(&mut self, style: &str) {
        let _ = write!(self.buffer, r#"<text:p text:style-name="{}"/>"#, style);
    }

    /// Write one balanced run as a paragraph.
    pub fn write_paragraph(&mut self, run: &MarkupRun, style: &str) {
        let content = run.text.strip_prefix(QUOTE_MARKER).unwrap_or(&run.text);
        let _ = write!(self.buffer, r#"<text:p text:style-name="{}">"#, style);
        self.write_inline(content);
        self.buffer.push_str("</text:p>");
    }

    /// Recognize the token starting at the beginning of `rest`, with its
    /// length in bytes.
    fn token_at(&self, rest: &str) -> Option<(Token, usize)> {
        if rest.starts_with(COMMENT_START) {
            return Some((Token::Comment, COMMENT_START.len()));
        }
        self.tags.iter().enumerate().find_map(|(index, tag)| {
            if rest.starts_with(&tag.opening) {
                Some((Token::Open(index), tag.opening.len()))
            } else if rest.starts_with(&tag.closing) {
                Some((Token::Close(index), tag.closing.len()))
            } else {
                None
            }
        })
    }

    /// Write paragraph content, converting tags to spans.
    ///
    /// Spans are kept properly nested: closing a tag that is not innermost
    /// closes the spans opened after it and reopens them. A closing tag with
    /// no open span is written as text. Spans still open at the end of the
    /// line are closed there.
    fn write_inline(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let mut literal_start = 0;
        let mut cursor = 0;

        while let Some(offset) = memchr2(b'[', b'/', &bytes[cursor..]) {
            let at = cursor + offset;
            let Some((token, len)) = self.token_at(&line[at..]) else {
                cursor = at + 1;
                continue;
            };

            let end = match token {
                Token::Open(index) => {
                    self.buffer.push_str(&escape_text(&line[literal_start..at]));
                    self.open_span(index);
                    at + len
                },
                Token::Close(index) => {
                    self.buffer.push_str(&escape_text(&line[literal_start..at]));
                    self.close_span(index);
                    at + len
                },
                Token::Comment => {
                    let body_start = at + len;
                    let Some(body_len) = line[body_start..].find(COMMENT_END) else {
                        // Unpaired comment marker stays text
                        cursor = body_start;
                        continue;
                    };
                    self.buffer.push_str(&escape_text(&line[literal_start..at]));
                    self.write_annotation(line[body_start..body_start + body_len].trim());
                    body_start + body_len + COMMENT_END.len()
                },
            };
            literal_start = end;
            cursor = end;
        }

        self.buffer.push_str(&escape_text(&line[literal_start..]));
        while self.open.pop().is_some() {
            self.buffer.push_str("</text:span>");
        }
    }

    fn open_span(&mut self, index: usize) {
        let _ = write!(
            self.buffer,
            r#"<text:span text:style-name="{}">"#,
            self.span_styles[index]
        );
        self.open.push(index);
    }

    fn close_span(&mut self, index: usize) {
        let Some(depth) = self.open.iter().rposition(|&open| open == index) else {
            log::warn!("Closing tag {} without open span kept as text", self.tags[index].closing);
            self.buffer.push_str(&escape_text(&self.tags[index].closing));
            return;
        };

        let reopen = self.open.split_off(depth + 1);
        for _ in 0..=reopen.len() {
            self.buffer.push_str("</text:span>");
        }
        self.open.pop();
        for inner in reopen {
            self.open_span(inner);
        }
    }

    fn write_annotation(&mut self, body: &str) {
        self.buffer.push_str("<office:annotation>");
        if !self.options.author.is_empty() {
            let _ = write!(
                self.buffer,
                "<dc:creator>{}</dc:creator>",
                escape_text(&self.options.author)
            );
        }
        let _ = write!(
            self.buffer,
            "<text:p>{}</text:p></office:annotation>",
            escape_text(body)
        );
    }

    /// Get the final output.
    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Drop trailing lines holding only whitespace. Spaces at the end of the
/// last non-blank line are kept.
fn trim_trailing_blank_lines(text: &str) -> &str {
    let mut end = text.len();
    while let Some(newline) = text[..end].rfind('\n') {
        if !text[newline + 1..end].trim().is_empty() {
            break;
        }
        end = newline;
    }
    &text[..end]
}

/// Encode a block of bracket markup as ODT paragraph XML.
///
/// Returns an empty string for blank input. Trailing blank lines produce no
/// paragraphs; every other line, including its surrounding spaces, is kept.
///
/// # Examples
///
/// ```rust
/// use ywodt::markup::{EncoderOptions, encode};
///
/// let xml = encode("plain [b]bold\ncontinues[/b] plain", &EncoderOptions::default());
/// assert!(xml.starts_with(r#"<text:p text:style-name="Text_20_body">plain "#));
/// ```
pub fn encode(text: &str, options: &EncoderOptions) -> String {
    let mut writer = OdtWriter::new(options);
    writer.write_block(text);
    writer.finish()
}

/// Types that can be encoded as ODT paragraph XML.
///
/// # Examples
///
/// ```rust
/// use ywodt::markup::{EncoderOptions, ToOdtXml};
///
/// let options = EncoderOptions::new().with_languages(["fr"]);
/// let xml = "[lang=fr]oui[/lang=fr]".to_odt_xml_with_options(&options);
/// assert!(xml.contains(r#"<text:span text:style-name="T1">oui</text:span>"#));
/// ```
pub trait ToOdtXml {
    /// Encode with default options.
    fn to_odt_xml(&self) -> String {
        self.to_odt_xml_with_options(&EncoderOptions::default())
    }

    /// Encode with custom options.
    fn to_odt_xml_with_options(&self, options: &EncoderOptions) -> String;
}

impl ToOdtXml for str {
    fn to_odt_xml_with_options(&self, options: &EncoderOptions) -> String {
        encode(self, options)
    }
}

impl ToOdtXml for String {
    fn to_odt_xml_with_options(&self, options: &EncoderOptions) -> String {
        encode(self, options)
    }
}
