//! Wire header names and the request [`HeaderSet`].
//!
//! All names are stored lowercased. The protocol treats header names
//! case-insensitively, so lowercasing at insertion time makes lookups,
//! deduplication and the canonical sort order agree with each other.

use std::collections::BTreeMap;

/// `Date` header.
pub const DATE: &str = "date";
/// `Content-Type` header.
pub const CONTENT_TYPE: &str = "content-type";
/// Byte-range header for partial reads.
pub const RANGE: &str = "range";
/// `Content-Range` header for partial updates.
pub const CONTENT_RANGE: &str = "content-range";
/// Redirect-style header carrying the location of a created object.
pub const LOCATION: &str = "location";

/// Reserved prefix of every protocol-specific header.
pub const PROTOCOL_PREFIX: &str = "x-emc-";

/// Request signature.
pub const SIGNATURE: &str = "x-emc-signature";
/// Identity of the calling user (`subtenant/uid`).
pub const UID: &str = "x-emc-uid";
/// Non-listable user metadata.
pub const META: &str = "x-emc-meta";
/// Listable user metadata.
pub const LISTABLE_META: &str = "x-emc-listable-meta";
/// Metadata tag selector, or the listing tag for object queries.
pub const TAGS: &str = "x-emc-tags";
/// User metadata names to include in full-record listings.
pub const USER_TAGS: &str = "x-emc-user-tags";
/// System metadata names to include in full-record listings.
pub const SYSTEM_TAGS: &str = "x-emc-system-tags";
/// Maximum number of results in one listing page.
pub const LIMIT: &str = "x-emc-limit";
/// Continuation token of a paged listing.
pub const TOKEN: &str = "x-emc-token";
/// Asks the server to include metadata in listings.
pub const INCLUDE_META: &str = "x-emc-include-meta";
/// User grants of an access-control list.
pub const USER_ACL: &str = "x-emc-useracl";
/// Group grants of an access-control list.
pub const GROUP_ACL: &str = "x-emc-groupacl";

/// Content type used when the caller does not supply one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Returns `true` if `name` carries the reserved protocol prefix.
///
/// The comparison ignores ASCII case.
#[must_use]
pub fn is_protocol_header(name: &str) -> bool {
    name.len() >= PROTOCOL_PREFIX.len()
        && name.as_bytes()[..PROTOCOL_PREFIX.len()].eq_ignore_ascii_case(PROTOCOL_PREFIX.as_bytes())
}

/// Case-insensitive mapping from header name to value.
///
/// A `HeaderSet` is owned by exactly one request. It is filled in while the
/// request is being described, finalized with the date and signature headers
/// right before transmission, and then dropped.
///
/// # Examples
///
/// ```
/// use atmos_model::HeaderSet;
///
/// let mut headers = HeaderSet::new();
/// headers.insert("X-EMC-UID", "tenant/user");
/// assert_eq!(headers.get("x-emc-uid"), Some("tenant/user"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: BTreeMap<String, String>,
}

impl HeaderSet {
    /// Create an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any previous value. Returns the old value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.to_ascii_lowercase(), value.into())
    }

    /// Look up a header value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Remove a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&name.to_ascii_lowercase())
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no header is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over the protocol-specific (`x-emc-*`) headers in ascending
    /// name order.
    pub fn protocol_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(name, _)| is_protocol_header(name))
    }
}
