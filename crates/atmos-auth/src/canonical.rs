//! String-to-sign construction.
//!
//! The string to sign is built from five fixed lines followed by the
//! canonicalized `x-emc-*` headers:
//!
//! ```text
//! HTTP-Verb\n
//! content-type\n
//! range\n
//! date\n
//! canonical-resource\n
//! x-emc-a:value\n
//! x-emc-b:value
//! ```
//!
//! Empty fields still contribute their line terminator. There is no
//! terminator after the last header line, and when the request carries no
//! `x-emc-*` header the string ends right after the resource line.

use std::collections::BTreeMap;

use atmos_model::HeaderSet;
use atmos_model::header::{CONTENT_RANGE, CONTENT_TYPE, DATE, RANGE, SIGNATURE, is_protocol_header};
use percent_encoding::percent_decode_str;

/// Build the full string to sign.
///
/// The date header is read as-is; callers that want it generated go through
/// [`sign_request`](crate::signer::sign_request).
///
/// # Examples
///
/// ```
/// use atmos_auth::canonical::build_string_to_sign;
/// use atmos_model::HeaderSet;
///
/// let mut headers = HeaderSet::new();
/// headers.insert("date", "Mon, 1 Jan 2001 00:00:00 GMT");
/// headers.insert("x-emc-uid", "u");
///
/// let uri: http::Uri = "http://host/rest/objects".parse().unwrap();
/// let s = build_string_to_sign("GET", &uri, &headers);
/// assert_eq!(s, "GET\n\n\nMon, 1 Jan 2001 00:00:00 GMT\n/rest/objects\nx-emc-uid:u");
/// ```
#[must_use]
pub fn build_string_to_sign(method: &str, uri: &http::Uri, headers: &HeaderSet) -> String {
    let content_type = headers
        .get(CONTENT_TYPE)
        .map(str::to_lowercase)
        .unwrap_or_default();
    let range = headers
        .get(RANGE)
        .or_else(|| headers.get(CONTENT_RANGE))
        .unwrap_or("");
    let date = headers.get(DATE).unwrap_or("");
    let resource = build_canonical_resource(uri);
    let emc_headers = build_canonical_emc_headers(headers);

    format!("{method}\n{content_type}\n{range}\n{date}\n{resource}\n{emc_headers}")
}

/// Build the canonical resource: the percent-decoded, lowercased path,
/// followed by `?` and the raw query string when one is present.
///
/// # Examples
///
/// ```
/// use atmos_auth::canonical::build_canonical_resource;
///
/// let uri: http::Uri = "http://host/rest/Objects/AB%20C?metadata/user".parse().unwrap();
/// assert_eq!(build_canonical_resource(&uri), "/rest/objects/ab c?metadata/user");
/// ```
#[must_use]
pub fn build_canonical_resource(uri: &http::Uri) -> String {
    let path = percent_decode_str(uri.path())
        .decode_utf8_lossy()
        .to_lowercase();

    match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    }
}

/// Build the canonicalized `x-emc-*` header block.
///
/// Names are lowercased and sorted ascending, values are normalized with
/// [`normalize_value`], and lines are joined with a single `\n`. The
/// signature header itself is never part of the block.
#[must_use]
pub fn build_canonical_emc_headers(headers: &HeaderSet) -> String {
    let emc: BTreeMap<String, String> = headers
        .iter()
        .filter(|(name, _)| is_protocol_header(name) && !name.eq_ignore_ascii_case(SIGNATURE))
        .map(|(name, value)| (name.to_ascii_lowercase(), normalize_value(value)))
        .collect();

    emc.iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalize a header value for signing.
///
/// Newlines are dropped, runs of two or more spaces collapse to one space,
/// and leading and trailing whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use atmos_auth::canonical::normalize_value;
///
/// assert_eq!(normalize_value("  a   b  c "), "a b c");
/// ```
#[must_use]
pub fn normalize_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut prev_was_space = false;
    for ch in value.chars() {
        match ch {
            '\n' => {}
            ' ' if prev_was_space => {}
            ' ' => {
                result.push(' ');
                prev_was_space = true;
            }
            _ => {
                result.push(ch);
                prev_was_space = false;
            }
        }
    }
    result.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE_VALUE: &str = "Mon, 1 Jan 2001 00:00:00 GMT";

    fn uri(s: &str) -> http::Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_should_build_string_to_sign_for_post_with_acl() {
        let mut headers = HeaderSet::new();
        headers.insert(DATE, DATE_VALUE);
        headers.insert("x-emc-uid", "u");
        headers.insert("x-emc-useracl", "u1=FULL_CONTROL");

        let s = build_string_to_sign("POST", &uri("http://localhost/rest/objects"), &headers);
        assert_eq!(
            s,
            "POST\n\n\nMon, 1 Jan 2001 00:00:00 GMT\n/rest/objects\nx-emc-uid:u\nx-emc-useracl:u1=FULL_CONTROL"
        );
    }

    #[test]
    fn test_should_end_after_resource_line_without_emc_headers() {
        let mut headers = HeaderSet::new();
        headers.insert(DATE, DATE_VALUE);

        let s = build_string_to_sign("GET", &uri("http://localhost/rest/objects"), &headers);
        assert_eq!(s, "GET\n\n\nMon, 1 Jan 2001 00:00:00 GMT\n/rest/objects\n");
    }

    #[test]
    fn test_should_lowercase_content_type_only() {
        let mut headers = HeaderSet::new();
        headers.insert(CONTENT_TYPE, "Text/Plain");
        headers.insert(DATE, DATE_VALUE);
        headers.insert("x-emc-meta", "Name=Value");

        let s = build_string_to_sign("PUT", &uri("http://h/rest/objects/x"), &headers);
        assert!(s.starts_with("PUT\ntext/plain\n\n"));
        assert!(s.ends_with("x-emc-meta:Name=Value"));
    }

    #[test]
    fn test_should_prefer_range_over_content_range() {
        let mut headers = HeaderSet::new();
        headers.insert(CONTENT_RANGE, "bytes 0-9/100");
        headers.insert(DATE, DATE_VALUE);
        let s = build_string_to_sign("PUT", &uri("http://h/rest/objects/x"), &headers);
        assert!(s.starts_with("PUT\n\nbytes 0-9/100\n"));

        headers.insert(RANGE, "bytes=0-9");
        let s = build_string_to_sign("PUT", &uri("http://h/rest/objects/x"), &headers);
        assert!(s.starts_with("PUT\n\nbytes=0-9\n"));
    }

    #[test]
    fn test_should_decode_and_lowercase_path_but_keep_query_raw() {
        let resource = build_canonical_resource(&uri(
            "http://h/rest/Objects/Some%2FThing?metadata/User",
        ));
        assert_eq!(resource, "/rest/objects/some/thing?metadata/User");
    }

    #[test]
    fn test_should_sort_emc_headers_regardless_of_case() {
        let mut headers = HeaderSet::new();
        headers.insert("X-EMC-UserACL", "a=READ");
        headers.insert("x-emc-GROUPACL", "");
        headers.insert("X-Emc-Meta", "k=v");
        headers.insert("content-length", "12");

        assert_eq!(
            build_canonical_emc_headers(&headers),
            "x-emc-groupacl:\nx-emc-meta:k=v\nx-emc-useracl:a=READ"
        );
    }

    #[test]
    fn test_should_exclude_signature_header() {
        let mut headers = HeaderSet::new();
        headers.insert("x-emc-uid", "u");
        headers.insert(SIGNATURE, "stale");
        assert_eq!(build_canonical_emc_headers(&headers), "x-emc-uid:u");
    }

    #[test]
    fn test_should_normalize_header_values() {
        assert_eq!(
            normalize_value("NAME=the value  of the meta  data "),
            "NAME=the value of the meta data"
        );
        assert_eq!(normalize_value("a\nb"), "ab");
        assert_eq!(normalize_value("tab\tkept"), "tab\tkept");
        assert_eq!(normalize_value(""), "");
    }
}
