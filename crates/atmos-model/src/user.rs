//! Caller identity.

use std::fmt;

/// The identity a request is made and signed as.
///
/// `shared_secret` is the Base64 text issued by the server; it is decoded
/// into key material only when a request is signed.
#[derive(Clone, PartialEq, Eq)]
pub struct UserContext {
    /// User id, usually `subtenant/uid`.
    pub uid: String,
    /// Base64-encoded shared secret.
    pub shared_secret: String,
}

impl UserContext {
    /// Create a user context.
    pub fn new(uid: impl Into<String>, shared_secret: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            shared_secret: shared_secret.into(),
        }
    }

    /// Load the user context from `ATMOS_UID` and `ATMOS_SECRET`.
    ///
    /// Returns `None` if either variable is unset.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let uid = std::env::var("ATMOS_UID").ok()?;
        let shared_secret = std::env::var("ATMOS_SECRET").ok()?;
        Some(Self { uid, shared_secret })
    }
}

impl fmt::Debug for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserContext")
            .field("uid", &self.uid)
            .field("shared_secret", &"<redacted>")
            .finish()
    }
}
