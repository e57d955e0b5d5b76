//! Client configuration.
//!
//! Configuration is plain data, optionally loaded from `ATMOS_*` environment
//! variables.

use http::Uri;
use serde::{Deserialize, Serialize};

use crate::error::{AtmosError, AtmosResult};

const DEFAULT_CONTEXT_ROOT: &str = "/rest";
const DEFAULT_POOL_MAX_IDLE: usize = 200;

/// Where and how to reach the Atmos server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// `http` or `https`.
    pub scheme: String,
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Path prefix of the REST API.
    pub context_root: String,
    /// Idle connections kept per host by the HTTP transport.
    pub pool_max_idle_per_host: usize,
    /// Overall request timeout in seconds, if any.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("localhost", 80)
    }
}

impl ClientConfig {
    /// Create a configuration for `host:port`.
    ///
    /// The scheme is `https` for port 443 and `http` otherwise.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme_for_port(port).to_owned(),
            host: host.into(),
            port,
            context_root: DEFAULT_CONTEXT_ROOT.to_owned(),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE,
            timeout_secs: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `ATMOS_HOST`, `ATMOS_PORT`, `ATMOS_SCHEME`, `ATMOS_CONTEXT_ROOT`,
    /// `ATMOS_POOL_MAX_IDLE` and `ATMOS_TIMEOUT_SECS`. Unset or unparsable
    /// values keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("ATMOS_HOST") {
            config.host = v;
        }
        if let Some(port) = env_parse("ATMOS_PORT") {
            config.port = port;
        }
        config.scheme = match std::env::var("ATMOS_SCHEME") {
            Ok(v) => v.to_ascii_lowercase(),
            Err(_) => scheme_for_port(config.port).to_owned(),
        };
        if let Ok(v) = std::env::var("ATMOS_CONTEXT_ROOT") {
            config.context_root = v;
        }
        if let Some(max_idle) = env_parse("ATMOS_POOL_MAX_IDLE") {
            config.pool_max_idle_per_host = max_idle;
        }
        if let Some(secs) = env_parse("ATMOS_TIMEOUT_SECS") {
            config.timeout_secs = Some(secs);
        }

        config
    }

    /// Path of the object collection, e.g. `/rest/objects`.
    #[must_use]
    pub fn objects_path(&self) -> String {
        format!("{}/objects", self.context_root)
    }

    /// Build an absolute request URI for `path` and an optional raw query.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosError::Config`] if the parts do not form a valid URI.
    pub fn uri(&self, path: &str, query: Option<&str>) -> AtmosResult<Uri> {
        let path_and_query = match query {
            Some(q) => format!("{path}?{q}"),
            None => path.to_owned(),
        };
        Uri::builder()
            .scheme(self.scheme.as_str())
            .authority(format!("{}:{}", self.host, self.port))
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| AtmosError::Config(format!("invalid request URI: {e}")))
    }
}

fn scheme_for_port(port: u16) -> &'static str {
    if port == 443 { "https" } else { "http" }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}
