//! User and system metadata entries.

use serde::{Deserialize, Serialize};

/// A single metadata name/value pair attached to an object.
///
/// Listable entries are indexed by the server and can be used as tags when
/// querying objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Metadata name.
    pub name: String,
    /// Metadata value.
    pub value: String,
    /// Whether the entry is listable.
    pub listable: bool,
}

impl Metadata {
    /// Create a non-listable entry.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            listable: false,
        }
    }

    /// Create a listable entry.
    pub fn listable(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            listable: true,
        }
    }

    /// Render the entry as `name=value` for a metadata header.
    ///
    /// Commas and newlines are removed from the value because the header
    /// format uses them as separators. The stripping is lossy: a value read
    /// back from the server will not contain them.
    #[must_use]
    pub fn to_header_pair(&self) -> String {
        let value: String = self
            .value
            .chars()
            .filter(|c| *c != ',' && *c != '\n')
            .collect();
        format!("{}={value}", self.name)
    }
}

/// A metadata name used to select which entries a read returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataTag {
    /// Metadata name.
    pub name: String,
    /// Whether the named entry is listable.
    pub listable: bool,
}

impl MetadataTag {
    /// Create a tag.
    pub fn new(name: impl Into<String>, listable: bool) -> Self {
        Self {
            name: name.into(),
            listable,
        }
    }
}
