//! XML layer of the Atmos REST API.
//!
//! Atmos answers failed requests with a small error document and tag queries
//! with an object listing:
//!
//! ```xml
//! <Error><Code>1003</Code><Message>The requested object was not found.</Message></Error>
//!
//! <ListObjectsResponse xmlns="http://www.emc.com/cos/">
//!   <Object>
//!     <ObjectID>4924264aa10573d404924281caf51f049242d810edee</ObjectID>
//!     <SystemMetadataList>
//!       <Metadata><Name>size</Name><Value>12</Value><Listable>false</Listable></Metadata>
//!     </SystemMetadataList>
//!     <UserMetadataList>
//!       <Metadata><Name>color</Name><Value>blue</Value><Listable>true</Listable></Metadata>
//!     </UserMetadataList>
//!   </Object>
//! </ListObjectsResponse>
//! ```
//!
//! # Key components
//!
//! - [`parse_error_body`] extracts `Code` and `Message` from an error document
//! - [`ListingParser`] turns a listing into identifiers or full records;
//!   [`StreamingListingParser`] drives a single forward-only cursor over the
//!   body, [`DocumentListingParser`] buffers the document first

pub mod document;
pub mod error;
pub mod error_body;
pub mod listing;
mod text;

pub use document::DocumentListingParser;
pub use error::XmlError;
pub use error_body::{ErrorBody, parse_error_body};
pub use listing::{EMC_NAMESPACE, ListingParser, StreamingListingParser};
