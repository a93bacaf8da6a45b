//! Comment capture sub-state of the decoder.
//!
//! An `office:annotation` sits inline inside a paragraph and carries its own
//! paragraphs. By convention the annotation starts with attribution elements
//! (`dc:creator`, `dc:date`) outside any paragraph, then the comment body in
//! its first paragraph. Only text seen while exactly one annotation paragraph
//! has opened is captured.

use super::decoder::ParserMode;

/// State saved while an annotation is open.
#[derive(Debug, Clone, Default)]
pub struct CommentCapture {
    buffer: String,
    resume: Option<ParserMode>,
    nested: usize,
}

impl CommentCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an annotation is open
    pub fn is_active(&self) -> bool {
        self.resume.is_some()
    }

    /// Start capturing. `resume` is the mode restored when the annotation
    /// closes. An annotation opened inside another one only deepens the
    /// nesting; the outer capture continues.
    pub fn begin(&mut self, resume: ParserMode) {
        if self.resume.is_some() {
            self.nested += 1;
            return;
        }
        self.buffer.clear();
        self.resume = Some(resume);
    }

    /// Offer character data seen after `paragraphs_seen` annotation
    /// paragraphs have opened.
    pub fn accept(&mut self, paragraphs_seen: u32, text: &str) {
        if paragraphs_seen == 1 {
            self.buffer.push_str(text);
        }
    }

    /// Handle an annotation close. Returns the captured body and the mode to
    /// resume when the outermost annotation closes; `None` for nested closes.
    pub fn end(&mut self) -> Option<(String, ParserMode)> {
        if self.nested > 0 {
            self.nested -= 1;
            return None;
        }
        let resume = self.resume.take()?;
        Some((std::mem::take(&mut self.buffer), resume))
    }
}
