//! HMAC-SHA1 request signatures.

use std::fmt;

use atmos_model::HeaderSet;
use atmos_model::header::{DATE, SIGNATURE};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use tracing::debug;

use crate::canonical::build_string_to_sign;
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// Decoded shared-secret key material.
///
/// Decoding happens once, up front, so a malformed secret is reported as a
/// configuration error before anything is sent.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Decode a Base64 shared secret.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidSecret`] if the text is not valid Base64
    /// and [`AuthError::EmptySecret`] if it decodes to nothing.
    pub fn from_base64(secret: &str) -> Result<Self, AuthError> {
        let key = BASE64.decode(secret.trim())?;
        if key.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self(key))
    }

    /// Compute `Base64(HMAC-SHA1(key, data))`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidKey`] if the MAC rejects the key.
    pub fn sign(&self, data: &str) -> Result<String, AuthError> {
        let mut mac =
            HmacSha1::new_from_slice(&self.0).map_err(|e| AuthError::InvalidKey(e.to_string()))?;
        mac.update(data.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Format a timestamp the way the `Date` header expects it:
/// `Mon, 1 Jan 2001 00:00:00 GMT` (day of month not zero-padded).
#[must_use]
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %-d %b %Y %H:%M:%S GMT").to_string()
}

/// Sign a request in place.
///
/// If the header set has no `Date` header one is generated from the current
/// time and stored first, so the transmitted date is the signed date. The
/// computed signature is stored as `x-emc-signature` and also returned.
///
/// Signing the same headers, URI and key twice yields the same signature
/// once the date is fixed.
///
/// # Errors
///
/// Returns [`AuthError::InvalidKey`] if the MAC cannot be computed.
pub fn sign_request(
    method: &http::Method,
    uri: &http::Uri,
    headers: &mut HeaderSet,
    key: &SigningKey,
) -> Result<String, AuthError> {
    if !headers.contains(DATE) {
        headers.insert(DATE, format_http_date(Utc::now()));
    }

    let string_to_sign = build_string_to_sign(method.as_str(), uri, headers);

    debug!(string_to_sign = ?string_to_sign, "Built string to sign");

    let signature = key.sign(&string_to_sign)?;
    headers.insert(SIGNATURE, signature.clone());
    Ok(signature)
}
