//! The single upstream call with a bounded lifetime.
//!
//! One attempt per inbound request, no retries: a failed call surfaces
//! immediately as an error to the caller. The deadline covers the whole
//! exchange; when it fires, the in-flight request is aborted.

use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use std::time::Duration;

/// Tagged result of a forwarding attempt.
#[derive(Debug)]
pub enum ForwardOutcome {
    /// The upstream answered; any status counts, 4xx/5xx included.
    Upstream(reqwest::Response),
    /// The deadline expired and the call was aborted.
    TimedOut,
    /// Connection refused, DNS failure, TLS error, or any other
    /// transport-level failure.
    Transport(reqwest::Error),
}

/// Upstream HTTP client with a per-request deadline.
pub struct Forwarder {
    client: reqwest::Client,
    deadline: Duration,
}

impl Forwarder {
    /// Build the forwarder. The connection pool is shared across requests;
    /// the deadline applies to each call individually.
    pub fn new(deadline: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, deadline })
    }

    /// Perform the single upstream call.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> ForwardOutcome {
        let mut request = self
            .client
            .request(method, url)
            .headers(headers)
            .timeout(self.deadline);
        if let Some(body) = body {
            request = request.body(body);
        }

        match request.send().await {
            Ok(response) => ForwardOutcome::Upstream(response),
            Err(error) if error.is_timeout() => ForwardOutcome::TimedOut,
            Err(error) => ForwardOutcome::Transport(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::get;
    use std::net::SocketAddr;

    async fn spawn(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn relays_upstream_response() {
        let addr = spawn(Router::new().route("/ping", get(|| async { "pong" }))).await;
        let forwarder = Forwarder::new(Duration::from_secs(5)).unwrap();

        let outcome = forwarder
            .send(
                Method::GET,
                &format!("http://{addr}/ping"),
                HeaderMap::new(),
                None,
            )
            .await;

        match outcome {
            ForwardOutcome::Upstream(response) => {
                assert_eq!(response.status(), 200);
                assert_eq!(response.text().await.unwrap(), "pong");
            }
            other => panic!("expected upstream response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deadline_expiry_is_timed_out() {
        let addr = spawn(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        ))
        .await;
        let forwarder = Forwarder::new(Duration::from_millis(100)).unwrap();

        let outcome = forwarder
            .send(
                Method::GET,
                &format!("http://{addr}/slow"),
                HeaderMap::new(),
                None,
            )
            .await;

        assert!(matches!(outcome, ForwardOutcome::TimedOut));
    }

    #[tokio::test]
    async fn connection_refused_is_transport() {
        // Bind and drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let forwarder = Forwarder::new(Duration::from_secs(1)).unwrap();
        let outcome = forwarder
            .send(
                Method::GET,
                &format!("http://{addr}/anything"),
                HeaderMap::new(),
                None,
            )
            .await;

        assert!(matches!(outcome, ForwardOutcome::Transport(_)));
    }
}
