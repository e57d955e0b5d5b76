//! Request construction.
//!
//! An [`AtmosRequest`] collects the method, target and headers of one call.
//! [`AtmosRequest::sign`] consumes it and yields a [`SignedRequest`] whose
//! headers include the date and signature, ready for a transport.

use std::fmt;
use std::io::{Cursor, Read};

use atmos_auth::{SigningKey, sign_request};
use atmos_model::header::{
    CONTENT_TYPE, DEFAULT_CONTENT_TYPE, INCLUDE_META, LIMIT, SYSTEM_TAGS, TAGS, TOKEN, UID,
    USER_TAGS,
};
use atmos_model::{Grant, HeaderSet, Metadata, MetadataTag, UserContext};
use bytes::Bytes;
use http::{Method, Uri};

use crate::encode::{encode_acl, encode_metadata, encode_metadata_tags, encode_tag_list};
use crate::error::AtmosResult;

/// An unsigned request.
#[derive(Debug, Clone)]
pub struct AtmosRequest {
    method: Method,
    uri: Uri,
    headers: HeaderSet,
}

impl AtmosRequest {
    /// Start a request on behalf of `user`.
    ///
    /// The `x-emc-uid` header is always set.
    #[must_use]
    pub fn new(method: Method, uri: Uri, user: &UserContext) -> Self {
        let mut headers = HeaderSet::new();
        headers.insert(UID, user.uid.as_str());
        Self {
            method,
            uri,
            headers,
        }
    }

    /// Set the content type, defaulting to `application/octet-stream`.
    #[must_use]
    pub fn content_type(mut self, content_type: Option<&str>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE));
        self
    }

    /// Attach metadata entries.
    #[must_use]
    pub fn metadata(mut self, metadata: &[Metadata]) -> Self {
        encode_metadata(&mut self.headers, metadata);
        self
    }

    /// Attach an access-control list.
    #[must_use]
    pub fn acl(mut self, grants: &[Grant]) -> Self {
        encode_acl(&mut self.headers, grants);
        self
    }

    /// Restrict a metadata read to the named entries.
    #[must_use]
    pub fn metadata_tags(mut self, tags: &[MetadataTag]) -> Self {
        encode_metadata_tags(&mut self.headers, tags);
        self
    }

    /// Set the listable tag a listing queries.
    #[must_use]
    pub fn tag(mut self, tag: &str) -> Self {
        self.headers.insert(TAGS, tag);
        self
    }

    /// Cap the number of results per page. Zero means no cap.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        if limit > 0 {
            self.headers.insert(LIMIT, limit.to_string());
        }
        self
    }

    /// Continue a listing from a previous page.
    #[must_use]
    pub fn continuation_token(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token {
            self.headers.insert(TOKEN, token);
        }
        self
    }

    /// Ask a listing to include object metadata.
    #[must_use]
    pub fn include_metadata(mut self, include: bool) -> Self {
        if include {
            self.headers.insert(INCLUDE_META, "1");
        } else {
            self.headers.remove(INCLUDE_META);
        }
        self
    }

    /// Select which user metadata a listing returns.
    #[must_use]
    pub fn user_metadata_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        encode_tag_list(&mut self.headers, USER_TAGS, tags);
        self
    }

    /// Select which system metadata a listing returns.
    #[must_use]
    pub fn system_metadata_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        encode_tag_list(&mut self.headers, SYSTEM_TAGS, tags);
        self
    }

    /// Set an arbitrary header, such as `range`.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The headers collected so far.
    #[must_use]
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Sign the request and attach an optional body.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosError::Credentials`](crate::AtmosError::Credentials) if
    /// the signature cannot be computed.
    pub fn sign(mut self, key: &SigningKey, body: Option<RequestBody>) -> AtmosResult<SignedRequest> {
        sign_request(&self.method, &self.uri, &mut self.headers, key)?;
        Ok(SignedRequest {
            method: self.method,
            uri: self.uri,
            headers: self.headers,
            body,
        })
    }
}

/// A request body: a reader and the number of bytes it yields.
pub struct RequestBody {
    reader: Box<dyn Read + Send>,
    length: u64,
}

impl RequestBody {
    /// Wrap a reader that yields exactly `length` bytes.
    pub fn new(reader: impl Read + Send + 'static, length: u64) -> Self {
        Self {
            reader: Box::new(reader),
            length,
        }
    }

    /// A body held in memory.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let length = data.len() as u64;
        Self::new(Cursor::new(data), length)
    }

    /// Number of bytes in the body.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Whether the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Take the reader.
    #[must_use]
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.reader
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBody")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// A signed request, ready to be executed.
#[derive(Debug)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URI.
    pub uri: Uri,
    /// Final headers, including `date` and `x-emc-signature`.
    pub headers: HeaderSet,
    /// Optional body.
    pub body: Option<RequestBody>,
}

#[cfg(test)]
mod tests {
    use atmos_model::header::{DATE, LISTABLE_META, META, SIGNATURE, USER_ACL};
    use atmos_model::{Grantee, Permission};

    use super::*;

    const TEST_SECRET: &str = "YXRtb3MtdGVzdC1zaGFyZWQtc2VjcmV0";

    fn user() -> UserContext {
        UserContext::new("u", TEST_SECRET)
    }

    fn objects_uri() -> Uri {
        "http://localhost/rest/objects".parse().unwrap()
    }

    #[test]
    fn test_should_always_set_uid() {
        let request = AtmosRequest::new(Method::GET, objects_uri(), &user());
        assert_eq!(request.headers().get(UID), Some("u"));
    }

    #[test]
    fn test_should_default_content_type() {
        let request = AtmosRequest::new(Method::POST, objects_uri(), &user()).content_type(None);
        assert_eq!(
            request.headers().get(CONTENT_TYPE),
            Some("application/octet-stream")
        );

        let request =
            AtmosRequest::new(Method::POST, objects_uri(), &user()).content_type(Some("text/plain"));
        assert_eq!(request.headers().get(CONTENT_TYPE), Some("text/plain"));
    }

    #[test]
    fn test_should_set_listing_headers() {
        let request = AtmosRequest::new(Method::GET, objects_uri(), &user())
            .tag("color")
            .limit(0)
            .continuation_token(None)
            .include_metadata(true)
            .user_metadata_tags(&["a", "b"])
            .system_metadata_tags::<&str>(&[]);

        let headers = request.headers();
        assert_eq!(headers.get(TAGS), Some("color"));
        assert!(!headers.contains(LIMIT));
        assert!(!headers.contains(TOKEN));
        assert_eq!(headers.get(INCLUDE_META), Some("1"));
        assert_eq!(headers.get(USER_TAGS), Some("a,b"));
        assert!(!headers.contains(SYSTEM_TAGS));

        let request = request
            .limit(25)
            .continuation_token(Some("tok"))
            .include_metadata(false);
        assert_eq!(request.headers().get(LIMIT), Some("25"));
        assert_eq!(request.headers().get(TOKEN), Some("tok"));
        assert!(!request.headers().contains(INCLUDE_META));
    }

    #[test]
    fn test_should_encode_metadata_and_acl() {
        let request = AtmosRequest::new(Method::POST, objects_uri(), &user())
            .metadata(&[Metadata::listable("color", "blue")])
            .acl(&[Grant::new(Grantee::user("u1"), Permission::FullControl)]);

        assert_eq!(request.headers().get(LISTABLE_META), Some("color=blue"));
        assert!(!request.headers().contains(META));
        assert_eq!(request.headers().get(USER_ACL), Some("u1=FULL_CONTROL"));
    }

    #[test]
    fn test_should_sign_with_known_vector() {
        let key = SigningKey::from_base64(TEST_SECRET).unwrap();
        let signed = AtmosRequest::new(Method::POST, objects_uri(), &user())
            .header(DATE, "Mon, 1 Jan 2001 00:00:00 GMT")
            .acl(&[Grant::new(Grantee::user("u1"), Permission::FullControl)])
            .sign(&key, Some(RequestBody::bytes("hello")))
            .unwrap();

        // x-emc-groupacl is set (empty) alongside x-emc-useracl, so it is signed too
        let expected = key
            .sign("POST\n\n\nMon, 1 Jan 2001 00:00:00 GMT\n/rest/objects\nx-emc-groupacl:\nx-emc-uid:u\nx-emc-useracl:u1=FULL_CONTROL")
            .unwrap();
        assert_eq!(signed.headers.get(SIGNATURE), Some(expected.as_str()));
        assert_eq!(signed.method, Method::POST);
        assert_eq!(signed.body.as_ref().map(RequestBody::len), Some(5));
    }

    #[test]
    fn test_should_read_in_memory_body() {
        let body = RequestBody::bytes(vec![1u8, 2, 3]);
        assert_eq!(body.len(), 3);
        assert!(!body.is_empty());

        let mut data = Vec::new();
        body.into_reader().read_to_end(&mut data).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }
}
