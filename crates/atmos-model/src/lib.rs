//! Protocol types for the Atmos object storage REST API.
//!
//! This crate holds the vocabulary shared by the signing, XML and client
//! crates: wire header names, the case-insensitive [`HeaderSet`], user
//! metadata, access-control grants, object identifiers and listing pages.
//!
//! Nothing in here performs I/O. Types are plain values that are built once
//! per request and dropped with it.

pub mod acl;
pub mod error;
pub mod header;
pub mod metadata;
pub mod object;
pub mod user;

pub use acl::{Grant, Grantee, GranteeKind, Permission};
pub use error::ModelError;
pub use header::HeaderSet;
pub use metadata::{Metadata, MetadataTag};
pub use object::{ObjectId, ObjectInfo, QueryPage};
pub use user::UserContext;
