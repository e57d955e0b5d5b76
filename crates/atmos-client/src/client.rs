//! The blocking object-store façade.

use std::io::{self, Read};
use std::sync::Arc;

use atmos_auth::SigningKey;
use atmos_model::{Grant, Metadata, MetadataTag, ObjectId, ObjectInfo, QueryPage, UserContext};
use atmos_xml::{ListingParser, StreamingListingParser};
use http::Method;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{AtmosError, AtmosResult};
use crate::request::{AtmosRequest, RequestBody};
use crate::response::AtmosResponse;
use crate::transport::{HttpTransport, Transport};

const USER_METADATA_QUERY: &str = "metadata/user";
const SYSTEM_METADATA_QUERY: &str = "metadata/system";

/// Optional attributes of an object write.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// MIME type of the content. `application/octet-stream` when unset.
    pub content_type: Option<String>,
    /// Grants to apply.
    pub acl: Vec<Grant>,
    /// Metadata to attach.
    pub metadata: Vec<Metadata>,
}

/// A tag query.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Listable tag to query.
    pub tag: String,
    /// Maximum results per page, zero for the server default.
    pub limit: u32,
    /// Token from the previous page.
    pub continuation_token: Option<String>,
    /// User metadata to return with each record.
    pub user_metadata_tags: Vec<String>,
    /// System metadata to return with each record.
    pub system_metadata_tags: Vec<String>,
}

impl ListQuery {
    /// Query objects carrying `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Cap the page size.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Continue from a previous page.
    #[must_use]
    pub fn continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    /// Continue from the page the given one points to, if any.
    #[must_use]
    pub fn after<T>(mut self, page: &QueryPage<T>) -> Self {
        self.continuation_token.clone_from(&page.continuation_token);
        self
    }
}

/// Client for the Atmos REST API.
///
/// Calls are blocking and independent of each other; a client can be shared
/// between threads and every call builds, signs and reads its own request.
#[derive(Debug)]
pub struct AtmosClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
    listing_parser: Arc<dyn ListingParser>,
}

impl AtmosClient<HttpTransport> {
    /// Create a client with a pooled HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> AtmosResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client configured from `ATMOS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosError::Transport`] if the HTTP client cannot be built.
    pub fn from_env() -> AtmosResult<Self> {
        Self::new(ClientConfig::from_env())
    }
}

impl<T: Transport> AtmosClient<T> {
    /// Create a client on top of any transport.
    ///
    /// Listings are parsed with a [`StreamingListingParser`].
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            listing_parser: Arc::new(StreamingListingParser::default()),
        }
    }

    /// Use a different listing parser.
    #[must_use]
    pub fn with_listing_parser(mut self, parser: Arc<dyn ListingParser>) -> Self {
        self.listing_parser = parser;
        self
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Store a new object and return its identifier.
    pub fn create_object(
        &self,
        user: &UserContext,
        body: RequestBody,
        options: &WriteOptions,
    ) -> AtmosResult<ObjectId> {
        let key = signing_key(user)?;
        check_body(&body)?;

        let uri = self.config.uri(&self.config.objects_path(), None)?;
        let request = AtmosRequest::new(Method::POST, uri, user)
            .content_type(options.content_type.as_deref())
            .acl(&options.acl)
            .metadata(&options.metadata);

        self.execute(request, &key, Some(body))?.object_id()
    }

    /// Replace the content of an existing object.
    pub fn update_object(
        &self,
        user: &UserContext,
        id: &ObjectId,
        body: RequestBody,
        options: &WriteOptions,
    ) -> AtmosResult<()> {
        let key = signing_key(user)?;
        check_body(&body)?;

        let uri = self.object_uri(id, None)?;
        let request = AtmosRequest::new(Method::PUT, uri, user)
            .content_type(options.content_type.as_deref())
            .metadata(&options.metadata)
            .acl(&options.acl);

        self.execute(request, &key, Some(body))?;
        Ok(())
    }

    /// Open the content of an object for reading.
    ///
    /// The returned reader holds the connection until it is dropped.
    pub fn read_object(&self, user: &UserContext, id: &ObjectId) -> AtmosResult<Box<dyn Read + Send>> {
        let key = signing_key(user)?;
        let uri = self.object_uri(id, None)?;
        let request = AtmosRequest::new(Method::GET, uri, user);

        let body = self.execute(request, &key, None)?.into_body();
        Ok(body.unwrap_or_else(|| Box::new(io::empty()) as Box<dyn Read + Send>))
    }

    /// Delete an object.
    pub fn delete_object(&self, user: &UserContext, id: &ObjectId) -> AtmosResult<()> {
        let key = signing_key(user)?;
        let uri = self.object_uri(id, None)?;
        let request = AtmosRequest::new(Method::DELETE, uri, user);

        self.execute(request, &key, None)?;
        Ok(())
    }

    /// Add or replace user metadata on an object.
    pub fn set_user_metadata(
        &self,
        user: &UserContext,
        id: &ObjectId,
        metadata: &[Metadata],
    ) -> AtmosResult<()> {
        let key = signing_key(user)?;
        if metadata.is_empty() {
            return Err(AtmosError::InvalidInput(
                "at least one metadata entry must be provided".to_owned(),
            ));
        }

        let uri = self.object_uri(id, Some(USER_METADATA_QUERY))?;
        let request = AtmosRequest::new(Method::POST, uri, user).metadata(metadata);

        self.execute(request, &key, None)?;
        Ok(())
    }

    /// Read user metadata, optionally restricted to the given names.
    pub fn get_user_metadata(
        &self,
        user: &UserContext,
        id: &ObjectId,
        tags: &[MetadataTag],
    ) -> AtmosResult<Vec<Metadata>> {
        self.get_metadata(user, id, tags, USER_METADATA_QUERY)
    }

    /// Read system metadata, optionally restricted to the given names.
    pub fn get_system_metadata(
        &self,
        user: &UserContext,
        id: &ObjectId,
        tags: &[MetadataTag],
    ) -> AtmosResult<Vec<Metadata>> {
        self.get_metadata(user, id, tags, SYSTEM_METADATA_QUERY)
    }

    /// List identifiers of objects carrying the query tag.
    ///
    /// Metadata selectors on `query` are ignored.
    pub fn list_objects(&self, user: &UserContext, query: &ListQuery) -> AtmosResult<QueryPage<ObjectId>> {
        let key = signing_key(user)?;
        let request = self.listing_request(user, query)?;

        let page = self
            .execute(request, &key, None)?
            .into_query_page(|body| self.listing_parser.parse_identifiers(body))?;
        Ok(page.map(ObjectId::from))
    }

    /// List objects carrying the query tag together with their metadata.
    pub fn list_objects_with_metadata(
        &self,
        user: &UserContext,
        query: &ListQuery,
    ) -> AtmosResult<QueryPage<ObjectInfo>> {
        let key = signing_key(user)?;
        let request = self
            .listing_request(user, query)?
            .include_metadata(true)
            .user_metadata_tags(&query.user_metadata_tags)
            .system_metadata_tags(&query.system_metadata_tags);

        self.execute(request, &key, None)?
            .into_query_page(|body| self.listing_parser.parse_objects(body))
    }

    fn get_metadata(
        &self,
        user: &UserContext,
        id: &ObjectId,
        tags: &[MetadataTag],
        query: &str,
    ) -> AtmosResult<Vec<Metadata>> {
        let key = signing_key(user)?;
        let uri = self.object_uri(id, Some(query))?;
        let request = AtmosRequest::new(Method::GET, uri, user).metadata_tags(tags);

        self.execute(request, &key, None)?.metadata()
    }

    fn listing_request(&self, user: &UserContext, query: &ListQuery) -> AtmosResult<AtmosRequest> {
        if query.tag.trim().is_empty() {
            return Err(AtmosError::InvalidInput("a listing tag must be provided".to_owned()));
        }

        let uri = self.config.uri(&self.config.objects_path(), None)?;
        Ok(AtmosRequest::new(Method::GET, uri, user)
            .tag(&query.tag)
            .limit(query.limit)
            .continuation_token(query.continuation_token.as_deref()))
    }

    fn object_uri(&self, id: &ObjectId, query: Option<&str>) -> AtmosResult<http::Uri> {
        self.config
            .uri(&id.resource_path(&self.config.context_root), query)
    }

    fn execute(
        &self,
        request: AtmosRequest,
        key: &SigningKey,
        body: Option<RequestBody>,
    ) -> AtmosResult<AtmosResponse> {
        let signed = request.sign(key, body)?;
        debug!(method = %signed.method, uri = %signed.uri, "Executing signed request");

        let raw = self.transport.execute(signed)?;
        AtmosResponse::validate(raw)
    }
}

/// Check the caller identity and decode its secret before any I/O.
fn signing_key(user: &UserContext) -> AtmosResult<SigningKey> {
    if user.uid.trim().is_empty() {
        return Err(AtmosError::InvalidInput(
            "a valid uid must be provided in the user context".to_owned(),
        ));
    }
    if user.shared_secret.trim().is_empty() {
        return Err(AtmosError::InvalidInput(
            "a valid shared secret must be provided in the user context".to_owned(),
        ));
    }
    Ok(SigningKey::from_base64(&user.shared_secret)?)
}

fn check_body(body: &RequestBody) -> AtmosResult<()> {
    if body.is_empty() {
        return Err(AtmosError::InvalidInput(
            "the body length must be greater than 0".to_owned(),
        ));
    }
    Ok(())
}
