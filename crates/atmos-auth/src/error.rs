//! Error types for request signing.
//!
//! Every variant is a configuration problem: it is detected before any
//! network I/O and retrying the same request cannot succeed.

/// Errors that can occur while preparing a request signature.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The shared secret is not valid Base64.
    #[error("shared secret is not valid Base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    /// The shared secret decoded to no key material.
    #[error("shared secret is empty")]
    EmptySecret,

    /// The MAC could not be initialised with the key material.
    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}
