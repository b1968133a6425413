//! Header filtering for both legs of the proxy, plus response hardening.
//!
//! Outbound: everything from the original request is forwarded except
//! hop-by-hop headers, `Host`, `Cookie`, and any client-supplied
//! `Authorization` (the gateway's injected bearer is authoritative).
//! Inbound: the backend's headers are relayed minus hop-by-hop and framing
//! headers, then a fixed set of security headers is stamped on every
//! response the gateway produces.

use axum::http::header::{
    self, AUTHORIZATION, CONTENT_LENGTH, COOKIE, HOST, HeaderMap, HeaderName, HeaderValue,
};

/// Headers meaningful only for a single transport leg; never forwarded.
const HOP_BY_HOP_HEADERS: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Application identifier header injected on every outbound call.
pub const APP_ID_HEADER: &str = "x-app-id";

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name) || name.as_str() == "keep-alive"
}

/// Build the header map for the outbound upstream request.
///
/// Copies the original headers minus hop-by-hop, `Host`, `Cookie`,
/// `Authorization`, and `Content-Length` (the client recomputes framing),
/// then injects `x-app-id` and, when a token is present, the bearer
/// `Authorization`. A token that is not a valid header value is treated as
/// absent; the backend's 401 reports the consequence.
#[must_use]
pub fn outbound_headers(
    inbound: &HeaderMap,
    access_token: Option<&str>,
    app_id: &str,
) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 2);

    for (name, value) in inbound {
        if is_hop_by_hop(name)
            || *name == HOST
            || *name == COOKIE
            || *name == AUTHORIZATION
            || *name == CONTENT_LENGTH
        {
            continue;
        }
        // `append`, not `insert`: iteration yields one pair per value, and
        // multi-valued headers must survive the copy.
        outbound.append(name.clone(), value.clone());
    }

    if let Some(token) = access_token {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            outbound.insert(AUTHORIZATION, value);
        }
    }

    if let Ok(value) = HeaderValue::from_str(app_id) {
        outbound.insert(HeaderName::from_static(APP_ID_HEADER), value);
    }

    outbound
}

/// Select the backend response headers safe to relay to the browser.
///
/// Hop-by-hop and framing headers are dropped; the relayed body is buffered,
/// so the server recomputes `Content-Length` itself.
#[must_use]
pub fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if is_hop_by_hop(name) || *name == CONTENT_LENGTH {
            continue;
        }
        relayed.append(name.clone(), value.clone());
    }
    relayed
}

/// Stamp the baseline security headers, overriding any backend-supplied
/// values. Applied to every gateway response, error responses included.
pub fn harden(headers: &mut HeaderMap) {
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sensitive_and_hop_by_hop_headers() {
        let mut inbound = HeaderMap::new();
        inbound.insert(HOST, "gateway.local".parse().unwrap());
        inbound.insert(COOKIE, "access_token=secret".parse().unwrap());
        inbound.insert(AUTHORIZATION, "Bearer client-supplied".parse().unwrap());
        inbound.insert(header::CONNECTION, "keep-alive".parse().unwrap());
        inbound.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());

        let outbound = outbound_headers(&inbound, None, "inventory-web");

        assert!(!outbound.contains_key(HOST));
        assert!(!outbound.contains_key(COOKIE));
        assert!(!outbound.contains_key(AUTHORIZATION));
        assert!(!outbound.contains_key(header::CONNECTION));
        assert_eq!(outbound.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn injects_bearer_and_app_id() {
        let outbound = outbound_headers(&HeaderMap::new(), Some("tok123"), "inventory-web");

        assert_eq!(outbound.get(AUTHORIZATION).unwrap(), "Bearer tok123");
        assert_eq!(outbound.get(APP_ID_HEADER).unwrap(), "inventory-web");
    }

    #[test]
    fn app_id_present_without_token() {
        let outbound = outbound_headers(&HeaderMap::new(), None, "inventory-web");

        assert!(!outbound.contains_key(AUTHORIZATION));
        assert_eq!(outbound.get(APP_ID_HEADER).unwrap(), "inventory-web");
    }

    #[test]
    fn invalid_token_treated_as_absent() {
        let outbound = outbound_headers(&HeaderMap::new(), Some("bad\ntoken"), "inventory-web");
        assert!(!outbound.contains_key(AUTHORIZATION));
    }

    #[test]
    fn relay_drops_framing_headers() {
        let mut upstream = HeaderMap::new();
        upstream.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        upstream.insert(CONTENT_LENGTH, "42".parse().unwrap());
        upstream.insert(header::TRANSFER_ENCODING, "chunked".parse().unwrap());

        let relayed = relay_headers(&upstream);

        assert_eq!(relayed.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert!(!relayed.contains_key(CONTENT_LENGTH));
        assert!(!relayed.contains_key(header::TRANSFER_ENCODING));
    }

    #[test]
    fn relay_preserves_multi_valued_headers() {
        let mut upstream = HeaderMap::new();
        upstream.append(header::SET_COOKIE, "a=1".parse().unwrap());
        upstream.append(header::SET_COOKIE, "b=2".parse().unwrap());

        let relayed = relay_headers(&upstream);

        let values: Vec<_> = relayed
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["a=1", "b=2"]);
    }

    #[test]
    fn outbound_preserves_multi_valued_headers() {
        let mut inbound = HeaderMap::new();
        inbound.append("x-filter", "status eq open".parse().unwrap());
        inbound.append("x-filter", "owner eq me".parse().unwrap());

        let outbound = outbound_headers(&inbound, None, "inventory-web");

        let values: Vec<_> = outbound
            .get_all("x-filter")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["status eq open", "owner eq me"]);
    }

    #[test]
    fn harden_overrides_existing_values() {
        let mut headers = HeaderMap::new();
        headers.insert(header::X_FRAME_OPTIONS, "SAMEORIGIN".parse().unwrap());

        harden(&mut headers);

        assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(
            headers.get(header::REFERRER_POLICY).unwrap(),
            "strict-origin-when-cross-origin"
        );
    }
}
