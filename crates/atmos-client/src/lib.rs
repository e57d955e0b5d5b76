//! Blocking client for the Atmos object storage REST API.
//!
//! Every call follows the same pipeline:
//!
//! 1. the request headers are built from metadata, grants and tags
//!    ([`encode`], [`AtmosRequest`])
//! 2. the request is signed with the caller's shared secret
//!    ([`AtmosRequest::sign`])
//! 3. a [`Transport`] sends it and returns the raw response
//! 4. the response is validated; failures become a [`StructuredFault`]
//!    ([`AtmosResponse::validate`])
//! 5. listings are handed to the configured
//!    [`ListingParser`](atmos_xml::ListingParser)
//!
//! [`AtmosClient`] wires these steps together.
//!
//! ```no_run
//! use atmos_client::{AtmosClient, ClientConfig, ListQuery, RequestBody, WriteOptions};
//! use atmos_model::{Metadata, UserContext};
//!
//! # fn main() -> Result<(), atmos_client::AtmosError> {
//! let client = AtmosClient::new(ClientConfig::new("atmos.example.com", 443))?;
//! let user = UserContext::new("subtenant/user", "c2VjcmV0LWtleQ==");
//!
//! let options = WriteOptions {
//!     metadata: vec![Metadata::listable("project", "apollo")],
//!     ..WriteOptions::default()
//! };
//! let id = client.create_object(&user, RequestBody::bytes("hello"), &options)?;
//!
//! let page = client.list_objects(&user, &ListQuery::new("project").limit(100))?;
//! assert!(page.results.contains(&id));
//! # Ok(())
//! # }
//! ```

mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{AtmosClient, ListQuery, WriteOptions};
pub use config::ClientConfig;
pub use error::{AtmosError, AtmosResult, StructuredFault, TransportError};
pub use request::{AtmosRequest, RequestBody, SignedRequest};
pub use response::{AtmosResponse, RawResponse};
pub use transport::{HttpTransport, Transport};
