//! Admin gate: every protected route runs behind [`require_admin`].
//!
//! The gate reads the `userLogin` cookie, verifies its signature and expiry, and
//! only then hands the request to the handler with an [`AdminIdentity`] in the
//! request extensions. On failure the handler is never called.

use axum::{
    extract::{Extension, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use super::{
    session::{AuthError, extract_session_token, now_ms, verify},
    state::AuthState,
};
use crate::api::error::ApiError;

/// Identity of the authenticated administrator for the current request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminIdentity {
    pub login: String,
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        Self::Unauthorized
    }
}

/// Resolve the session cookie in `headers` into an admin identity.
///
/// # Errors
/// Returns [`AuthError`] when the cookie is absent, malformed, tampered with or expired.
pub fn authenticate(
    headers: &HeaderMap,
    auth_state: &AuthState,
    now_ms: u64,
) -> Result<AdminIdentity, AuthError> {
    let token = extract_session_token(headers).ok_or(AuthError::Missing)?;
    let session = verify(&token, auth_state.secret(), now_ms)?;
    Ok(AdminIdentity {
        login: session.login,
    })
}

/// Middleware guarding the admin routes.
///
/// # Errors
/// Returns [`ApiError::Unauthorized`] when the request carries no valid session.
pub async fn require_admin(
    Extension(auth_state): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(request.headers(), &auth_state, now_ms()).map_err(|err| {
        debug!(reason = %err, path = %request.uri().path(), "admin request rejected");
        ApiError::from(err)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
