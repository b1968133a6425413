//! Process-wide gateway configuration.
//!
//! Loaded exactly once at startup (flags or environment) and immutable for
//! the life of the process. Handlers receive it through the shared
//! application state instead of reading the environment ad hoc.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Ceiling for inbound request bodies, in bytes (1 MiB).
///
/// Checked strictly before any upstream call is made.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Immutable gateway configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "stockgate", version, about)]
pub struct GatewayConfig {
    /// Base origin of the backend API all requests are forwarded to.
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Url,

    /// Static application identifier injected as `x-app-id` on every
    /// outbound call, authenticated or not.
    #[arg(long = "x-app-id", env = "X_APP_ID")]
    pub app_id: String,

    /// Socket address the gateway listens on.
    #[arg(long, env = "STOCKGATE_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Deadline for a single upstream call; the in-flight request is
    /// aborted when it expires.
    #[arg(
        long,
        env = "STOCKGATE_UPSTREAM_TIMEOUT",
        default_value = "30s",
        value_parser = humantime::parse_duration
    )]
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    /// Backend origin with any trailing slash removed, ready for the
    /// validated path to be appended.
    #[must_use]
    pub fn backend_base(&self) -> &str {
        self.backend_url.as_str().trim_end_matches('/')
    }
}
