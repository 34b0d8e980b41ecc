//! Error types for abbyyocr library.

use std::io;
use thiserror::Error;

/// Result type alias for abbyyocr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or rendering an OCR document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files or readers.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not well-formed XML (or not valid UTF-8).
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The root element does not belong to a known FineReader schema.
    #[error("Unrecognized schema: {}", .namespace.as_deref().unwrap_or("no namespace"))]
    UnrecognizedSchema {
        /// Namespace found on the root element, if any
        namespace: Option<String>,
    },

    /// A numeric attribute is missing, non-numeric or geometrically invalid.
    #[error("Malformed geometry at {node}: attribute '{attribute}' {}", describe_value(.value))]
    MalformedGeometry {
        /// Path of the offending node, e.g. `page[2]/block[1]`
        node: String,
        /// Attribute name (or a pseudo name like `bbox`)
        attribute: String,
        /// Raw attribute value, `None` when the attribute is absent
        value: Option<String>,
    },

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

fn describe_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("has invalid value {:?}", v),
        None => "is missing".to_string(),
    }
}

impl Error {
    /// Build a [`Error::MalformedGeometry`] for a node path.
    pub fn malformed(
        node: impl Into<String>,
        attribute: impl Into<String>,
        value: Option<&str>,
    ) -> Self {
        Error::MalformedGeometry {
            node: node.into(),
            attribute: attribute.into(),
            value: value.map(str::to_string),
        }
    }

    /// Check whether this error is scoped to a single node.
    ///
    /// Node-scoped errors can be skipped by lenient callers; everything else
    /// makes the whole document unusable.
    pub fn is_node_scoped(&self) -> bool {
        matches!(self, Error::MalformedGeometry { .. })
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnrecognizedSchema { namespace: None };
        assert_eq!(err.to_string(), "Unrecognized schema: no namespace");

        let err = Error::UnrecognizedSchema {
            namespace: Some("urn:example".to_string()),
        };
        assert_eq!(err.to_string(), "Unrecognized schema: urn:example");
    }

    #[test]
    fn test_malformed_geometry_display() {
        let err = Error::malformed("page[2]/block[1]", "l", Some("abc"));
        assert_eq!(
            err.to_string(),
            "Malformed geometry at page[2]/block[1]: attribute 'l' has invalid value \"abc\""
        );

        let err = Error::malformed("page[1]", "width", None);
        assert_eq!(
            err.to_string(),
            "Malformed geometry at page[1]: attribute 'width' is missing"
        );
        assert!(err.is_node_scoped());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_node_scoped());
    }
}
