//! Structural events: the decoder's output.

use crate::odf::core::Attributes;
use serde::{Deserialize, Serialize};

/// One decoder output unit.
///
/// Events mirror input document order exactly. Consumers reconstruct the
/// chapter/scene tree by recognizing heading, paragraph and span patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructuralEvent {
    /// A structural or inline tag opens
    TagOpen { name: String, attributes: Attributes },
    /// The innermost open tag with this name closes
    TagClose { name: String },
    /// Character data inside a text block
    Text(String),
    /// The body of an inline authoring annotation
    Comment(String),
}

impl StructuralEvent {
    /// Tag open without attributes
    pub fn open(name: impl Into<String>) -> Self {
        StructuralEvent::TagOpen {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Tag open with attributes
    pub fn open_with(name: impl Into<String>, attributes: Attributes) -> Self {
        StructuralEvent::TagOpen {
            name: name.into(),
            attributes,
        }
    }

    pub fn close(name: impl Into<String>) -> Self {
        StructuralEvent::TagClose { name: name.into() }
    }

    pub fn text(content: impl Into<String>) -> Self {
        StructuralEvent::Text(content.into())
    }

    pub fn comment(content: impl Into<String>) -> Self {
        StructuralEvent::Comment(content.into())
    }

    /// Name of the tag this event opens or closes
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            StructuralEvent::TagOpen { name, .. } | StructuralEvent::TagClose { name } => Some(name),
            _ => None,
        }
    }
}

/// Check that every `TagOpen` has a later matching `TagClose`, properly
/// nested.
pub fn is_balanced(events: &[StructuralEvent]) -> bool {
    let mut open: Vec<&str> = Vec::new();
    for event in events {
        match event {
            StructuralEvent::TagOpen { name, .. } => open.push(name),
            StructuralEvent::TagClose { name } => {
                if open.pop() != Some(name.as_str()) {
                    return false;
                }
            },
            _ => {},
        }
    }
    open.is_empty()
}
