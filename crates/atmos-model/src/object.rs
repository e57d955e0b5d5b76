//! Object identifiers, listing records and result pages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// Server-assigned object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the object resource below the REST context root.
    ///
    /// ```
    /// use atmos_model::ObjectId;
    ///
    /// let id = ObjectId::new("4a1b");
    /// assert_eq!(id.resource_path("/rest"), "/rest/objects/4a1b");
    /// ```
    #[must_use]
    pub fn resource_path(&self, context_root: &str) -> String {
        format!("{context_root}/objects/{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An object returned by a full-record listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object identifier.
    pub id: String,
    /// User metadata, in document order.
    pub user_metadata: Vec<Metadata>,
    /// System metadata, in document order.
    pub system_metadata: Vec<Metadata>,
}

/// One page of a tag query.
///
/// `results` is empty when the server returned no objects or no body at all;
/// both cases mean there is nothing to consume on this page. The
/// continuation token is independent of the body and must be passed back
/// unchanged to fetch the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPage<T> {
    /// Results in document order.
    pub results: Vec<T>,
    /// Opaque cursor for the next page, if there is one.
    pub continuation_token: Option<String>,
}

impl<T> QueryPage<T> {
    /// Create a page.
    #[must_use]
    pub fn new(results: Vec<T>, continuation_token: Option<String>) -> Self {
        Self {
            results,
            continuation_token,
        }
    }

    /// Whether the page holds no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether the server indicated more results are available.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }

    /// Convert every result, keeping the continuation token.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> QueryPage<U> {
        QueryPage {
            results: self.results.into_iter().map(f).collect(),
            continuation_token: self.continuation_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_resource_path() {
        let id = ObjectId::new("abc");
        assert_eq!(id.resource_path("/rest"), "/rest/objects/abc");
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn test_should_map_page_and_keep_token() {
        let page = QueryPage::new(vec!["a".to_owned(), "b".to_owned()], Some("t1".to_owned()));
        let mapped = page.map(ObjectId::from);
        assert_eq!(mapped.results, vec![ObjectId::new("a"), ObjectId::new("b")]);
        assert_eq!(mapped.continuation_token.as_deref(), Some("t1"));
        assert!(mapped.has_more());
    }

    #[test]
    fn test_should_report_empty_page() {
        let page: QueryPage<String> = QueryPage::new(Vec::new(), None);
        assert!(page.is_empty());
        assert!(!page.has_more());
    }
}
