//! The seam between the client and the network.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::blocking::{Body, Client};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::request::SignedRequest;
use crate::response::RawResponse;

/// Executes signed requests.
///
/// One transport is shared by every call of a client, possibly from many
/// threads at once, so implementations must be `Send + Sync`. Each call
/// owns its request and response; nothing is carried over between calls.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send `request` and return the raw response without judging its
    /// status.
    fn execute(&self, request: SignedRequest) -> Result<RawResponse, TransportError>;
}

/// Blocking HTTP transport backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with pool and timeout settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().pool_max_idle_per_host(config.pool_max_idle_per_host);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Use an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: SignedRequest) -> Result<RawResponse, TransportError> {
        let SignedRequest {
            method,
            uri,
            headers,
            body,
        } = request;

        let mut header_map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers.iter() {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                    name: name.to_owned(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_bytes(value.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                    name: name.to_owned(),
                    reason: e.to_string(),
                })?;
            header_map.insert(header_name, header_value);
        }

        let url = uri.to_string();
        debug!(%method, %url, "Sending request");

        let mut builder = self.client.request(method, url).headers(header_map);
        if let Some(body) = body {
            let length = body.len();
            builder = builder.body(Body::sized(body.into_reader(), length));
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        debug!(%status, "Received response");

        let body = if response.content_length() == Some(0) {
            None
        } else {
            Some(Box::new(response) as Box<dyn Read + Send>)
        };

        Ok(RawResponse {
            status,
            reason: None,
            headers,
            body,
        })
    }
}
