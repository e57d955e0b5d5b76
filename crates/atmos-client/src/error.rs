//! Error types for the Atmos client.

use std::error::Error as StdError;
use std::fmt;

use atmos_auth::AuthError;
use atmos_xml::XmlError;

/// Boxed error kept as the cause of a fault.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Every error a client call can return.
///
/// Variants follow the lifecycle of a call: configuration and input problems
/// are detected before any I/O, transport errors while talking to the
/// server, faults and parse errors while reading its answer. None of them
/// is retried by the client.
#[derive(Debug, thiserror::Error)]
pub enum AtmosError {
    /// Invalid client configuration, such as an unusable endpoint.
    #[error("configuration error: {0}")]
    Config(String),

    /// The shared secret cannot be used as a signing key.
    #[error("invalid credentials: {0}")]
    Credentials(#[from] AuthError),

    /// Invalid call arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error(transparent)]
    Fault(#[from] StructuredFault),

    /// A response header did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A response body was not a valid listing document.
    #[error("failed to parse response body: {0}")]
    Xml(#[from] XmlError),
}

impl AtmosError {
    /// The structured fault, if the server rejected the call.
    #[must_use]
    pub fn as_fault(&self) -> Option<&StructuredFault> {
        match self {
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Convenience result type for client operations.
pub type AtmosResult<T> = Result<T, AtmosError>;

/// Errors raised by a [`Transport`](crate::transport::Transport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O error while streaming a body.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A header could not be put on the wire.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// A non-success answer from the server.
///
/// Built once while validating a response and never modified afterwards.
/// `error_code` is the Atmos code from the error body; it is absent when the
/// server sent no body or the body carried no code.
#[derive(Debug)]
pub struct StructuredFault {
    http_status: u16,
    error_code: Option<i32>,
    message: String,
    source: Option<BoxError>,
}

impl StructuredFault {
    pub(crate) fn new(http_status: u16, error_code: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            http_status,
            error_code,
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// HTTP status code of the response.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Atmos error code, if the server sent one.
    #[must_use]
    pub fn error_code(&self) -> Option<i32> {
        self.error_code
    }

    /// Error message, or the HTTP reason phrase when the body had none.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StructuredFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_code {
            Some(code) => write!(
                f,
                "{} (http status {}, atmos code {code})",
                self.message, self.http_status
            ),
            None => write!(f, "{} (http status {})", self.message, self.http_status),
        }
    }
}

impl StdError for StructuredFault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}
