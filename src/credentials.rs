//! Credential loading from server-side session cookies.
//!
//! The access and refresh tokens live in HTTP-only cookies set by the
//! external authentication flow; the browser's JS bundle never sees them.
//! The gateway reads them per-request and never persists or logs them.
//!
//! The [`CredentialProvider`] trait keeps the gateway logic independent of
//! the HTTP framework's cookie API: a missing token is a valid state (the
//! request is forwarded without `Authorization` and the backend's own 401
//! becomes the single source of truth for "unauthenticated").

use axum_extra::extract::CookieJar;

/// Cookie holding the bearer access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie holding the refresh token. Read for completeness; the gateway
/// itself performs no refresh (that is an external collaborator's job).
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Narrow interface for per-request credential lookup.
pub trait CredentialProvider {
    /// Fetch a named credential, if present.
    fn get(&self, name: &str) -> Option<String>;

    /// The bearer access token for the current session, if any.
    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_COOKIE)
    }

    /// The refresh token for the current session, if any.
    fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_COOKIE)
    }
}

/// Production provider backed by the request's cookie jar.
pub struct CookieCredentials {
    jar: CookieJar,
}

impl From<CookieJar> for CookieCredentials {
    fn from(jar: CookieJar) -> Self {
        Self { jar }
    }
}

impl CredentialProvider for CookieCredentials {
    fn get(&self, name: &str) -> Option<String> {
        self.jar.get(name).map(|cookie| cookie.value().to_string())
    }
}
