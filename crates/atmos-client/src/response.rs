//! Response validation and header decoding.
//!
//! A [`RawResponse`] comes straight from the transport. It becomes an
//! [`AtmosResponse`] only through [`AtmosResponse::validate`], which turns
//! every non-success status into a [`StructuredFault`]. Accessors therefore
//! never see a failed response.

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::sync::LazyLock;

use atmos_model::header::{LISTABLE_META, LOCATION, META, TOKEN};
use atmos_model::{Metadata, ObjectId, QueryPage};
use atmos_xml::{ErrorBody, XmlError, parse_error_body};
use http::{HeaderMap, StatusCode};
use regex::Regex;
use tracing::warn;

use crate::error::{AtmosError, AtmosResult, StructuredFault};

static OBJECT_ID_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"/\w+/objects/([0-9a-f]{44})"));

/// A response as received from the transport.
pub struct RawResponse {
    /// Status code.
    pub status: StatusCode,
    /// Reason phrase from the status line, if the transport knows it.
    pub reason: Option<String>,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body, if there is one.
    pub body: Option<Box<dyn Read + Send>>,
}

impl RawResponse {
    /// Create a response without a body.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach a body.
    #[must_use]
    pub fn with_body(mut self, body: impl Read + Send + 'static) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    /// Reason phrase to report, falling back to the canonical one.
    fn reason_phrase(&self) -> String {
        self.reason
            .clone()
            .or_else(|| self.status.canonical_reason().map(str::to_owned))
            .unwrap_or_default()
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// A response that passed validation.
pub struct AtmosResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Box<dyn Read + Send>>,
}

impl AtmosResponse {
    /// Validate a raw response.
    ///
    /// Statuses up to 299 are accepted. Anything else becomes a
    /// [`StructuredFault`]:
    ///
    /// - without a body, the fault carries the reason phrase only
    /// - with an `<Error>` body, it carries the parsed code and message;
    ///   a missing message falls back to the reason phrase
    /// - a body that cannot be read or parsed yields a reason-phrase fault
    ///   with the failure as its source
    ///
    /// # Errors
    ///
    /// Returns [`AtmosError::Fault`] for every non-success status.
    pub fn validate(raw: RawResponse) -> AtmosResult<Self> {
        if raw.status.as_u16() <= 299 {
            return Ok(Self {
                status: raw.status,
                headers: raw.headers,
                body: raw.body,
            });
        }

        let fault = build_fault(raw);
        warn!(
            http_status = fault.http_status(),
            error_code = ?fault.error_code(),
            message = fault.message(),
            "Request rejected by server"
        );
        Err(fault.into())
    }

    /// Status code of the response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, decoded as UTF-8 from its raw bytes.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
    }

    /// Like [`header`](Self::header), but invalid UTF-8 is an error.
    fn header_text(&self, name: &str) -> AtmosResult<Option<&str>> {
        self.headers
            .get(name)
            .map(|v| {
                std::str::from_utf8(v.as_bytes())
                    .map_err(|e| AtmosError::Parse(format!("{name} header is not valid UTF-8: {e}")))
            })
            .transpose()
    }

    /// Identifier of a newly created object, taken from `location`.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosError::Parse`] if the header is missing or holds no
    /// `/<root>/objects/<44 hex digits>` segment.
    pub fn object_id(&self) -> AtmosResult<ObjectId> {
        let location = self
            .header(LOCATION)
            .ok_or_else(|| AtmosError::Parse("response has no location header".to_owned()))?;
        let pattern = OBJECT_ID_PATTERN
            .as_ref()
            .map_err(|e| AtmosError::Parse(e.to_string()))?;

        pattern
            .captures(location)
            .and_then(|c| c.get(1))
            .map(|m| ObjectId::new(m.as_str()))
            .ok_or_else(|| AtmosError::Parse(format!("could not parse object id from {location}")))
    }

    /// Metadata carried in the response headers.
    ///
    /// Non-listable entries from `x-emc-meta` come first, then listable ones
    /// from `x-emc-listable-meta`.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosError::Parse`] if a header is not UTF-8 or an entry
    /// has no `=`.
    pub fn metadata(&self) -> AtmosResult<Vec<Metadata>> {
        let mut entries = Vec::new();
        if let Some(value) = self.header_text(META)? {
            decode_metadata(value, false, &mut entries)?;
        }
        if let Some(value) = self.header_text(LISTABLE_META)? {
            decode_metadata(value, true, &mut entries)?;
        }
        Ok(entries)
    }

    /// Continuation token for the next listing page.
    #[must_use]
    pub fn continuation_token(&self) -> Option<String> {
        self.header(TOKEN).map(str::to_owned)
    }

    /// Take the body.
    #[must_use]
    pub fn into_body(self) -> Option<Box<dyn Read + Send>> {
        self.body
    }

    /// Turn a listing response into a page.
    ///
    /// The token is read from the headers first, so it is returned even
    /// when there is no body. An absent body yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosError::Xml`] if `parse` rejects the body.
    pub fn into_query_page<T>(
        self,
        parse: impl FnOnce(&mut dyn BufRead) -> Result<Vec<T>, XmlError>,
    ) -> AtmosResult<QueryPage<T>> {
        let token = self.continuation_token();
        let results = match self.body {
            Some(body) => parse(&mut BufReader::new(body))?,
            None => Vec::new(),
        };
        Ok(QueryPage::new(results, token))
    }
}

impl fmt::Debug for AtmosResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtmosResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

fn build_fault(mut raw: RawResponse) -> StructuredFault {
    let status = raw.status.as_u16();
    let reason = raw.reason_phrase();

    let Some(body) = raw.body.take() else {
        return StructuredFault::new(status, None, reason);
    };

    match parse_error_body(BufReader::new(body)) {
        Ok(ErrorBody {
            code: None,
            message: None,
        }) => StructuredFault::new(status, None, reason),
        Ok(ErrorBody { code, message }) => {
            let message = message.unwrap_or_else(|| reason.clone());
            match code.map(|c| c.parse::<i32>()).transpose() {
                Ok(error_code) => StructuredFault::new(status, error_code, message),
                Err(e) => StructuredFault::new(status, None, message).with_source(e),
            }
        }
        Err(e) => StructuredFault::new(status, None, reason).with_source(e),
    }
}

/// Decode a metadata header value of `name=value` pairs separated by `,`.
///
/// Names are trimmed, values are kept as sent.
fn decode_metadata(header: &str, listable: bool, out: &mut Vec<Metadata>) -> AtmosResult<()> {
    for pair in header.split(',') {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| AtmosError::Parse(format!("malformed metadata entry: {pair:?}")))?;
        out.push(Metadata {
            name: name.trim().to_owned(),
            value: value.to_owned(),
            listable,
        });
    }
    Ok(())
}
