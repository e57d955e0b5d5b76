//! Error types for the Atmos model.

/// Errors raised while converting protocol text into model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The permission name is not one the protocol defines.
    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    /// The grantee kind is neither `USER` nor `GROUP`.
    #[error("unknown grantee kind: {0}")]
    UnknownGranteeKind(String),
}
