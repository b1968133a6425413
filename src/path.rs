//! Upstream path reconstruction and validation.
//!
//! The wildcard route hands the gateway an ordered sequence of path segments.
//! Before anything is forwarded, the joined path is checked for traversal
//! (`..`) and empty-segment smuggling (`//`). Validation is substring-based
//! and intentionally simple: no case folding, no percent-decoding. The
//! backend owns its own route matching.

use crate::error::GatewayError;

/// Validate a candidate upstream path.
///
/// Rejects any path containing the literal substring `..` (directory
/// traversal) or `//` (empty segment, including one produced by a trailing
/// or doubled slash in the original URL).
pub fn validate_path(path: &str) -> Result<(), GatewayError> {
    if path.contains("..") || path.contains("//") {
        return Err(GatewayError::InvalidPath);
    }
    Ok(())
}

/// Join wildcard segments with `/` and validate the result.
///
/// This is the pure form of the route reconstruction: it is independent of
/// any routing framework and is what the fuzz target exercises.
pub fn reconstruct<S: AsRef<str>>(segments: &[S]) -> Result<String, GatewayError> {
    let joined = segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/");
    validate_path(&joined)?;
    Ok(joined)
}
