//! Error types for XML parsing.

use std::io;

/// Errors that can occur while reading an Atmos XML document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error while reading the body.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// The document ended inside an open element.
    #[error("unexpected end of document: {0}")]
    UnexpectedEof(String),

    /// An error decoding text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}
