//! Core ODF reading functionality.
//!
//! This module provides the building blocks the decoder sits on: package
//! access, the XML notification reader and metadata extraction.

/// ODF metadata parsing
mod metadata;
/// ODF package handling
mod package;
/// ODF XML notification stream
mod xml;

// Re-export main types for convenience
pub use metadata::parse_metadata;
pub use package::OdtSource;
pub use xml::{Attributes, Notification, NotificationReader, XmlPart};
