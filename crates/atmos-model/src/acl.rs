//! Access-control grants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Permission level granted to a user or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Permission {
    /// No access; revokes an earlier grant.
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// Read content and metadata.
    #[serde(rename = "READ")]
    Read,
    /// Read and modify content and metadata.
    #[serde(rename = "WRITE")]
    Write,
    /// Read, write and change the ACL.
    #[serde(rename = "FULL_CONTROL")]
    FullControl,
}

impl Permission {
    /// Returns the wire value of this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::FullControl => "FULL_CONTROL",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "READ" => Ok(Self::Read),
            "WRITE" => Ok(Self::Write),
            "FULL_CONTROL" => Ok(Self::FullControl),
            other => Err(ModelError::UnknownPermission(other.to_owned())),
        }
    }
}

/// Whether a grantee names a single user or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GranteeKind {
    /// A single user id, sent in `x-emc-useracl`.
    #[serde(rename = "USER")]
    User,
    /// A named group such as `other`, sent in `x-emc-groupacl`.
    #[serde(rename = "GROUP")]
    Group,
}

impl GranteeKind {
    /// Returns the wire value of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Group => "GROUP",
        }
    }
}

impl fmt::Display for GranteeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GranteeKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "GROUP" => Ok(Self::Group),
            other => Err(ModelError::UnknownGranteeKind(other.to_owned())),
        }
    }
}

/// The subject of a grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grantee {
    /// User id or group name.
    pub subject: String,
    /// User or group.
    pub kind: GranteeKind,
}

impl Grantee {
    /// A single user.
    pub fn user(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: GranteeKind::User,
        }
    }

    /// A group of users.
    pub fn group(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: GranteeKind::Group,
        }
    }
}

/// An access-control entry binding a grantee to a permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    /// Who is granted access.
    pub grantee: Grantee,
    /// What they may do.
    pub permission: Permission,
}

impl Grant {
    /// Create a grant.
    #[must_use]
    pub fn new(grantee: Grantee, permission: Permission) -> Self {
        Self {
            grantee,
            permission,
        }
    }

    /// Render the grant as `subject=PERMISSION` for an ACL header.
    #[must_use]
    pub fn to_header_pair(&self) -> String {
        format!("{}={}", self.grantee.subject, self.permission)
    }
}
