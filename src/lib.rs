//! Stockgate - authenticated reverse-proxy gateway library.
//!
//! This library provides the proxy service, error handling, and credential
//! loading for the Stockgate sidecar that fronts the inventory backend API.
//!
//! # Request Pipeline
//!
//! Every inbound request at `/api/proxy/{*path}` runs the same pipeline:
//!
//! 1. Path reconstruction and validation ([`path`])
//! 2. Body size guard (1 MiB ceiling, before any upstream I/O)
//! 3. Credential loading from server-side cookies ([`credentials`])
//! 4. A single upstream call with a bounded deadline ([`forward`])
//! 5. Response relay with hardened security headers ([`headers`])
//!
//! The gateway holds no state across requests; the only process-wide shared
//! state is the immutable [`config::GatewayConfig`].

pub mod config;
pub mod credentials;
pub mod error;
pub mod forward;
pub mod headers;
pub mod path;
pub mod proxy_service;
