//! XML notification reader for ODF parts.
//!
//! The decoder consumes a flat stream of element-open, element-close and
//! character-data notifications. This module produces that stream from a
//! part's XML text using quick-xml.

use crate::common::xml::{resolve_entity, unescape_entities, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// XML content of one package part
#[derive(Debug, Clone)]
pub struct XmlPart {
    content: String,
}

impl XmlPart {
    /// Parse XML content from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(bytes)?.to_string();
        Ok(Self { content })
    }

    /// Wrap XML text that is already decoded
    pub fn from_string(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Get the raw XML content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Notification stream over this part
    pub fn notifications(&self) -> NotificationReader<'_> {
        NotificationReader::new(&self.content)
    }
}

/// Attribute list of an element-open notification, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Create an empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute by qualified name
    pub fn get(&self, key: &[u8]) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_bytes() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Append an attribute
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One flat XML notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Element start with its qualified name and attributes
    Open { name: String, attributes: Attributes },
    /// Element end with its qualified name
    Close { name: String },
    /// Character data, entities already resolved
    Text(String),
}

impl Notification {
    /// Element-open notification
    pub fn open<I, K, V>(name: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Notification::Open {
            name: name.to_string(),
            attributes: attributes.into_iter().collect(),
        }
    }

    /// Element-close notification
    pub fn close(name: &str) -> Self {
        Notification::Close {
            name: name.to_string(),
        }
    }

    /// Character-data notification
    pub fn text(content: &str) -> Self {
        Notification::Text(content.to_string())
    }
}

/// Streaming reader turning XML text into [`Notification`]s.
///
/// Adjacent character data (text, CDATA and entity references) is coalesced
/// into one `Text` notification. End-tag names are not checked here; the
/// decoder owns structural validation.
pub struct NotificationReader<'a> {
    reader: Reader<&'a [u8]>,
    buf: Vec<u8>,
    pending: VecDeque<Notification>,
    text: String,
    done: bool,
}

impl<'a> NotificationReader<'a> {
    /// Create a reader over XML text
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().check_end_names = false;
        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
            text: String::new(),
            done: false,
        }
    }

    fn open_notification(e: &BytesStart<'_>) -> Notification {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = unescape_entities(&String::from_utf8_lossy(&attr.value));
                (key, value)
            })
            .collect();
        Notification::Open { name, attributes }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.pending
                .push_back(Notification::Text(std::mem::take(&mut self.text)));
        }
    }

    /// Read until at least one notification is pending or input ends.
    fn fill(&mut self) -> Result<()> {
        while self.pending.is_empty() && !self.done {
            let event = self.reader.read_event_into(&mut self.buf);
            match event {
                Ok(Event::Start(ref e)) => {
                    let open = Self::open_notification(e);
                    self.flush_text();
                    self.pending.push_back(open);
                },
                Ok(Event::Empty(ref e)) => {
                    let open = Self::open_notification(e);
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.flush_text();
                    self.pending.push_back(open);
                    self.pending.push_back(Notification::Close { name });
                },
                Ok(Event::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.flush_text();
                    self.pending.push_back(Notification::Close { name });
                },
                Ok(Event::Text(ref t)) => {
                    self.text.push_str(&unescape_xml(&String::from_utf8_lossy(t)));
                },
                Ok(Event::CData(ref c)) => {
                    self.text.push_str(&String::from_utf8_lossy(c));
                },
                Ok(Event::GeneralRef(ref r)) => {
                    let name = String::from_utf8_lossy(r);
                    match resolve_entity(&name) {
                        Some(resolved) => self.text.push_str(&resolved),
                        None => {
                            log::warn!("Unknown entity reference &{};", name);
                            self.text.push('&');
                            self.text.push_str(&name);
                            self.text.push(';');
                        },
                    }
                },
                Ok(Event::Eof) => {
                    self.flush_text();
                    self.done = true;
                },
                Ok(_) => {},
                Err(e) => {
                    self.done = true;
                    return Err(Error::from(e));
                },
            }
            self.buf.clear();
        }
        Ok(())
    }
}

impl Iterator for NotificationReader<'_> {
    type Item = Result<Notification>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.fill() {
            return Some(Err(e));
        }
        self.pending.pop_front().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str) -> Vec<Notification> {
        NotificationReader::new(xml)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_start_text_end() {
        let notes = collect(r#"<text:p text:style-name="P1">Hello</text:p>"#);
        assert_eq!(
            notes,
            vec![
                Notification::open("text:p", [("text:style-name", "P1")]),
                Notification::text("Hello"),
                Notification::close("text:p"),
            ]
        );
    }

    #[test]
    fn test_empty_element_expands_to_open_close() {
        let notes = collect(r#"<text:p>a<text:s text:c="3"/>b</text:p>"#);
        assert_eq!(notes.len(), 7);
        assert_eq!(notes[2], Notification::open("text:s", [("text:c", "3")]));
        assert_eq!(notes[3], Notification::close("text:s"));
    }

    #[test]
    fn test_attribute_character_references() {
        let notes = collect(r#"<text:section text:name="Part&#x20;&#x41; &amp; &#66;"/>"#);
        assert_eq!(notes[0], Notification::open("text:section", [("text:name", "Part A & B")]));
    }

    #[test]
    fn test_entities_are_coalesced_into_one_text() {
        let notes = collect("<text:p>Tom &amp; Jerry &#x41;</text:p>");
        assert_eq!(notes[1], Notification::text("Tom & Jerry A"));
        assert_eq!(notes.len(), 3);
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let notes = collect(r#"<text:section text:name="A &amp; B"></text:section>"#);
        match &notes[0] {
            Notification::Open { attributes, .. } => {
                assert_eq!(attributes.get(b"text:name"), Some("A & B"));
                assert_eq!(attributes.get(b"text:missing"), None);
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_end_is_left_to_the_decoder() {
        let notes = collect("<a><b></a></b>");
        assert_eq!(notes[2], Notification::close("a"));
        assert_eq!(notes[3], Notification::close("b"));
    }

    #[test]
    fn test_invalid_utf8_part() {
        assert!(matches!(
            XmlPart::from_bytes(&[0x3c, 0xff]),
            Err(Error::InvalidFormat(_))
        ));
    }
}
