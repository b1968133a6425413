//! Gateway error taxonomy and the JSON error response contract.
//!
//! Every error path terminates in a JSON body with a single `error` field and
//! an appropriate status code. No stack traces, tokens, or upstream internals
//! ever appear in a response; the caller always receives an ordinary HTTP
//! response, even for timeouts and connection failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Wire shape of every gateway-produced error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// Errors produced by the gateway itself.
///
/// Upstream 4xx/5xx responses are not errors at this level; they are relayed
/// verbatim as a successful proxy operation carrying a non-2xx status.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The reconstructed path contained `..` or `//`.
    #[error("path failed validation")]
    InvalidPath,

    /// The request body exceeded the 1 MiB ceiling.
    #[error("request body exceeds the payload ceiling")]
    PayloadTooLarge,

    /// The request body could not be read from the client
    /// (e.g. the client disconnected mid-upload).
    #[error("request body could not be read")]
    BodyRead,

    /// The upstream call was aborted on its deadline.
    #[error("upstream call exceeded its deadline")]
    UpstreamTimeout,

    /// Any other transport-level failure reaching the upstream
    /// (connection refused, DNS failure, TLS error, ...).
    #[error("upstream transport failure")]
    UpstreamTransport(#[source] reqwest::Error),
}

impl GatewayError {
    /// HTTP status the error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidPath => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::BodyRead => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Caller-facing message. Deliberately static: nothing about the
    /// underlying cause leaks to the browser.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            GatewayError::InvalidPath => "Invalid path",
            GatewayError::PayloadTooLarge => "Payload too large",
            GatewayError::BodyRead => "Invalid request body",
            GatewayError::UpstreamTimeout => "Backend timeout",
            GatewayError::UpstreamTransport(_) => "Internal proxy error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            GatewayError::UpstreamTransport(source) => {
                tracing::error!(%status, error = %source, "upstream transport failure");
            }
            other => {
                tracing::warn!(%status, error = %other, "request rejected");
            }
        }
        (status, Json(ErrorBody { error: self.message() })).into_response()
    }
}
