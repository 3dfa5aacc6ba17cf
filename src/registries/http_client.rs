//! Shared HTTP client for registry lookups.
//!
//! One client is built at startup and handed to every registry so
//! connections and TLS sessions are reused across documents.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

// pub.dev asks API clients to identify themselves
const USER_AGENT: &str = concat!("pubspec-lsp/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn create_shared_client() -> anyhow::Result<Arc<Client>> {
    create_client_with_timeout(DEFAULT_TIMEOUT)
}

/// Build a client whose whole-request timeout is `timeout`.
///
/// The connect timeout never exceeds the request timeout.
pub fn create_client_with_timeout(timeout: Duration) -> anyhow::Result<Arc<Client>> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Duration::from_secs(60))
        .build()?;

    Ok(Arc::new(client))
}
