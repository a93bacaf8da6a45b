//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from
//! third-party error types to the unified Error type.

use super::types::Error;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::XmlError(e.to_string()),
            quick_xml::Error::IllFormed(e) => Error::MalformedStructure(e.to_string()),
            other => Error::XmlError(other.to_string()),
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidFormat(format!("Invalid UTF-8 in XML content: {}", err))
    }
}

#[cfg(feature = "odf")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => {
                Error::ComponentNotFound("File not found in archive".to_string())
            },
            other => Error::ZipError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_error_maps_to_invalid_format() {
        let bytes = [0xffu8, 0xfe];
        let err: Error = std::str::from_utf8(&bytes).unwrap_err().into();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_unmatched_close_message() {
        let err = Error::unmatched_close("text:p", Some("text:span"));
        assert!(err.is_malformed());
        assert_eq!(
            err.to_string(),
            "Malformed structure: closing </text:p> while <text:span> is still open"
        );
        let err = Error::unmatched_close("text:p", None);
        assert!(err.to_string().contains("without a matching open"));
    }
}
