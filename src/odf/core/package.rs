//! ODF package (ZIP archive) access.
//!
//! Reads the three parts the decoder consumes. Writing packages is left to
//! the caller.

use super::xml::XmlPart;
#[cfg(feature = "odf")]
use crate::common::{Error, Result};
#[cfg(feature = "odf")]
use crate::odf::constants::{CONTENT_PART, META_PART, MIMETYPE_PART, ODF_TEXT, STYLES_PART};
#[cfg(feature = "odf")]
use std::fs::File;
#[cfg(feature = "odf")]
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

/// The parts of an OpenDocument Text package the decoder needs.
///
/// `content` is always present. `styles` is required by the decoder but is
/// kept optional here so the decode can report its absence precisely.
#[derive(Debug, Clone)]
pub struct OdtSource {
    path: Option<PathBuf>,
    content: XmlPart,
    styles: Option<XmlPart>,
    meta: Option<XmlPart>,
}

impl OdtSource {
    /// Open an `.odt` file from disk.
    ///
    /// Any failure to open or read the archive, or a missing content part,
    /// is reported as [`Error::UnreadableSource`] carrying `path`.
    #[cfg(feature = "odf")]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let unreadable = |reason: String| Error::UnreadableSource {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
        let mut source =
            Self::from_reader(BufReader::new(file)).map_err(|e| unreadable(e.to_string()))?;
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    /// Open an ODF package from a reader
    #[cfg(feature = "odf")]
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Invalid ZIP archive: {}", e)))?;

        if let Some(mimetype) = read_part(&mut archive, MIMETYPE_PART)? {
            let mimetype = String::from_utf8_lossy(&mimetype);
            if mimetype.trim() != ODF_TEXT {
                log::warn!("Unexpected package mimetype {:?}", mimetype.trim());
            }
        }

        let content = read_part(&mut archive, CONTENT_PART)?
            .ok_or_else(|| Error::ComponentNotFound(CONTENT_PART.to_string()))?;
        let content = XmlPart::from_bytes(&content)?;
        let styles = read_part(&mut archive, STYLES_PART)?
            .map(|bytes| XmlPart::from_bytes(&bytes))
            .transpose()?;
        let meta = read_part(&mut archive, META_PART)?
            .map(|bytes| XmlPart::from_bytes(&bytes))
            .transpose()?;

        log::debug!(
            "Opened package: content {} bytes, styles {}, meta {}",
            content.content().len(),
            styles.is_some(),
            meta.is_some()
        );

        Ok(Self {
            path: None,
            content,
            styles,
            meta,
        })
    }

    /// Assemble a source from part texts already in memory
    pub fn from_parts(content: impl Into<String>, styles: Option<String>, meta: Option<String>) -> Self {
        Self {
            path: None,
            content: XmlPart::from_string(content),
            styles: styles.map(XmlPart::from_string),
            meta: meta.map(XmlPart::from_string),
        }
    }

    /// Path the source was opened from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Main document content
    pub fn content(&self) -> &XmlPart {
        &self.content
    }

    /// Style declarations, if the package has them
    pub fn styles(&self) -> Option<&XmlPart> {
        self.styles.as_ref()
    }

    /// Metadata, if the package has it
    pub fn meta(&self) -> Option<&XmlPart> {
        self.meta.as_ref()
    }
}

/// Read a part by name; `None` if the archive has no such entry.
#[cfg(feature = "odf")]
fn read_part<R: Read + Seek>(archive: &mut zip::ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(Some(content))
}
