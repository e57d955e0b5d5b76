//! Request signing for the Atmos REST API.
//!
//! Every request carries an `x-emc-signature` header computed as
//!
//! ```text
//! Signature = Base64(HMAC-SHA1(Base64Decode(SharedSecret), StringToSign))
//! ```
//!
//! where the string to sign binds the method, content type, byte range, date,
//! the normalized resource and every `x-emc-*` header:
//!
//! ```text
//! HTTP-Verb + "\n" +
//! lowercase(Content-Type) + "\n" +
//! (Range | Content-Range) + "\n" +
//! Date + "\n" +
//! lowercase(percent-decode(Path)) [+ "?" + Query] + "\n" +
//! CanonicalizedEmcHeaders
//! ```
//!
//! # Usage
//!
//! ```rust
//! use atmos_auth::{SigningKey, sign_request};
//! use atmos_model::HeaderSet;
//! use atmos_model::header::{DATE, SIGNATURE, UID};
//!
//! let key = SigningKey::from_base64("YXRtb3MtdGVzdC1zaGFyZWQtc2VjcmV0").unwrap();
//! let uri: http::Uri = "http://localhost/rest/objects".parse().unwrap();
//!
//! let mut headers = HeaderSet::new();
//! headers.insert(UID, "tenant/user");
//! headers.insert(DATE, "Mon, 1 Jan 2001 00:00:00 GMT");
//!
//! sign_request(&http::Method::GET, &uri, &mut headers, &key).unwrap();
//! assert!(headers.contains(SIGNATURE));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - String-to-sign construction
//! - [`error`] - Signing error types
//! - [`signer`] - Key handling, date generation and the HMAC computation

pub mod canonical;
pub mod error;
pub mod signer;

pub use canonical::build_string_to_sign;
pub use error::AuthError;
pub use signer::{SigningKey, format_http_date, sign_request};
