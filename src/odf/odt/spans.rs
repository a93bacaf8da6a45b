//! Open span stack.
//!
//! One `text:span` may contribute several inline tags (a bold French run is
//! both `lang_fr` and `strong`). The stack records every open tag plus how
//! many tags each span element pushed, so one span close pops exactly what
//! its open pushed, in reverse order.

use crate::common::{Error, Result};
use smallvec::SmallVec;

/// Tags pushed by one span element
pub type SpanTags = SmallVec<[String; 3]>;

/// LIFO record of currently open inline tags.
#[derive(Debug, Clone, Default)]
pub struct SpanStack {
    tags: Vec<String>,
    frames: Vec<usize>,
}

impl SpanStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a span element open and the tags it contributes, outermost
    /// first. A span with no recognized role pushes an empty frame.
    pub fn open(&mut self, tags: SpanTags) {
        self.frames.push(tags.len());
        self.tags.extend(tags);
    }

    /// Pop the tags of the innermost span element, innermost tag first.
    pub fn close(&mut self) -> Result<SpanTags> {
        let count = self.frames.pop().ok_or_else(|| {
            Error::MalformedStructure("span close with an empty span stack".to_string())
        })?;
        let start = self.tags.len() - count;
        Ok(self.tags.drain(start..).rev().collect())
    }

    /// Currently open tags, outermost first
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
