//! Integration tests for the Atmos client.
//!
//! These tests talk to a real Atmos endpoint configured through the
//! environment (`ATMOS_HOST`, `ATMOS_PORT`, `ATMOS_UID`, `ATMOS_SECRET`, ...).
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p atmos-integration -- --ignored
//! ```

use std::sync::Once;

use anyhow::Context;
use atmos_client::{AtmosClient, ClientConfig, RequestBody, WriteOptions};
use atmos_model::{Metadata, ObjectId, UserContext};
use tracing::warn;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create a client for the configured endpoint.
pub fn atmos_client() -> anyhow::Result<AtmosClient> {
    init_tracing();
    let config = ClientConfig::from_env();
    AtmosClient::new(config).context("failed to build Atmos client")
}

/// The user the tests run as.
pub fn test_user() -> anyhow::Result<UserContext> {
    UserContext::from_env().context("ATMOS_UID and ATMOS_SECRET must be set")
}

/// Generate a unique listable tag name for a test.
#[must_use]
pub fn test_tag(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_owned();
    format!("test{prefix}{id}")
}

/// Store an object tagged with `tag` and return its id.
pub fn create_tagged_object(
    client: &AtmosClient,
    user: &UserContext,
    tag: &str,
    content: &'static [u8],
) -> anyhow::Result<ObjectId> {
    let options = WriteOptions {
        content_type: Some("text/plain".to_owned()),
        metadata: vec![Metadata::listable(tag, "1"), Metadata::new("origin", "integration")],
        ..WriteOptions::default()
    };
    client
        .create_object(user, RequestBody::bytes(content), &options)
        .context("create_object")
}

/// Delete objects created by a test, ignoring failures.
pub fn cleanup_objects(client: &AtmosClient, user: &UserContext, ids: &[ObjectId]) {
    for id in ids {
        if let Err(e) = client.delete_object(user, id) {
            warn!(%id, error = %e, "Failed to delete test object");
        }
    }
}

mod test_error;
mod test_list;
mod test_metadata;
mod test_object;
