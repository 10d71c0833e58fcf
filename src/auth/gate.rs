//! Basic-auth header validation.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::{engine::general_purpose, Engine as _};

use crate::auth::credentials::CredentialSet;

/// Checks `authorization: Basic <base64(user:pass)>` against a credential set.
#[derive(Debug, Clone)]
pub struct AuthGate {
    credentials: CredentialSet,
}

impl AuthGate {
    pub fn new(credentials: CredentialSet) -> Self {
        Self { credentials }
    }

    /// True iff the header decodes to a pair present in the credential set.
    pub fn authenticate(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(decode_basic)
            .map(|(user, pass)| self.credentials.contains(&user, &pass))
            .unwrap_or(false)
    }
}

/// Split a `Basic` header value into its username and password.
fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?;
    let bytes = general_purpose::STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
