//! The proxy service: routing, the per-request pipeline, and response relay.
//!
//! A single wildcard route handles every method; the pipeline is the same
//! for all of them: validate the path, guard the body size, load
//! credentials, make the single upstream call, relay the answer. The
//! gateway holds no state between requests.

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{any, get};
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::{GatewayConfig, MAX_BODY_BYTES};
use crate::credentials::{CookieCredentials, CredentialProvider};
use crate::error::GatewayError;
use crate::forward::{ForwardOutcome, Forwarder};
use crate::{headers, path};

/// Shared application state: immutable config plus the upstream client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub forwarder: Arc<Forwarder>,
}

impl AppState {
    #[must_use]
    pub fn new(config: GatewayConfig, forwarder: Forwarder) -> Self {
        Self {
            config: Arc::new(config),
            forwarder: Arc::new(forwarder),
        }
    }
}

/// Build the gateway router.
///
/// The security-header layer wraps every route, so error responses and the
/// health endpoint carry the hardened headers too.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/proxy/{*path}", any(proxy))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Stamp the baseline security headers on every response.
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    headers::harden(response.headers_mut());
    response
}

/// The shared pipeline behind every method.
async fn proxy(
    State(state): State<AppState>,
    Path(wildcard): Path<String>,
    jar: CookieJar,
    request: Request,
) -> Result<Response, GatewayError> {
    path::validate_path(&wildcard)?;

    let (parts, body) = request.into_parts();

    // Size guard runs strictly before any upstream work. A declared
    // content-length over the ceiling is rejected without reading a byte;
    // otherwise the body is buffered with the same cap.
    if let Some(declared) = declared_content_length(&parts.headers) {
        if declared > MAX_BODY_BYTES as u64 {
            return Err(GatewayError::PayloadTooLarge);
        }
    }
    let body_bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(body_read_error)?;

    let credentials = CookieCredentials::from(jar);
    let token = credentials.access_token();
    let outbound = headers::outbound_headers(&parts.headers, token.as_deref(), &state.config.app_id);

    let mut target = format!("{}/{}", state.config.backend_base(), wildcard);
    if let Some(query) = parts.uri.query() {
        target.push('?');
        target.push_str(query);
    }
    tracing::debug!(method = %parts.method, %target, "forwarding request");

    let body = if body_bytes.is_empty() {
        None
    } else {
        Some(body_bytes)
    };

    match state
        .forwarder
        .send(parts.method, &target, outbound, body)
        .await
    {
        ForwardOutcome::Upstream(response) => relay(response).await,
        ForwardOutcome::TimedOut => Err(GatewayError::UpstreamTimeout),
        ForwardOutcome::Transport(error) => Err(GatewayError::UpstreamTransport(error)),
    }
}

/// Classify a capped body read failure: exceeding the ceiling is 413,
/// anything else (e.g. the client disconnecting mid-upload) is not.
fn body_read_error(error: axum::Error) -> GatewayError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&error);
    while let Some(cause) = source {
        if cause.is::<http_body_util::LengthLimitError>() {
            return GatewayError::PayloadTooLarge;
        }
        source = cause.source();
    }
    GatewayError::BodyRead
}

fn declared_content_length(headers: &axum::http::HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
}

/// Relay the backend's status, safe headers, and body verbatim.
async fn relay(upstream: reqwest::Response) -> Result<Response, GatewayError> {
    let status = upstream.status();
    let relayed = headers::relay_headers(upstream.headers());

    let body: Bytes = upstream.bytes().await.map_err(|error| {
        if error.is_timeout() {
            GatewayError::UpstreamTimeout
        } else {
            GatewayError::UpstreamTransport(error)
        }
    })?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = relayed;
    Ok(response)
}
