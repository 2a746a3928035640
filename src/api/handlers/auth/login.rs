use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use secrecy::SecretString;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    session::{issue, now_ms, session_cookie},
    state::AuthState,
    storage::lookup_password_digest,
    types::{LoginRequest, LoginResponse},
};
use crate::api::{error::ApiError, handlers::json_body};

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, `userLogin` cookie set", body = LoginResponse),
        (status = 400, description = "Login and password fields required", body = crate::api::error::ErrorBody),
        (status = 401, description = "Incorrect password", body = crate::api::error::ErrorBody),
        (status = 404, description = "Unknown login", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload, || ApiError::MissingCredentials)?;

    let (Some(login), Some(password)) = (
        request.login.filter(|login| !login.is_empty()),
        request.password.filter(|password| !password.is_empty()),
    ) else {
        return Err(ApiError::MissingCredentials);
    };
    let password = SecretString::from(password);

    let Some(digest) = lookup_password_digest(&pool, &login).await? else {
        debug!(%login, "login attempt for unknown user");
        return Err(ApiError::NotFound);
    };

    if !auth_state.hasher().verify(password, digest).await? {
        debug!(%login, "login attempt with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let (token, session) = issue(&login, auth_state.secret(), now_ms())?;
    let cookie = session_cookie(&token, auth_state.config().cookie_secure())
        .map_err(|err| anyhow::anyhow!("failed to build session cookie: {err}"))?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    info!(%login, "administrator authenticated");

    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            message: "Authenticated".to_string(),
            login: session.login,
            expires_at: session.expires_at_ms,
        }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::AuthConfig;
    use anyhow::Result;
    use axum::{Router, body::Body, http::Request, routing::post};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn router() -> Result<Router> {
        // Never connected: every request below is rejected before the database is touched.
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let auth_state = Arc::new(AuthState::new(
            AuthConfig::new(),
            SecretString::from("0123456789abcdef0123456789abcdef"),
        ));
        Ok(Router::new()
            .route("/login", post(login))
            .layer(Extension(auth_state))
            .layer(Extension(pool)))
    }

    async fn post_login(body: &'static str) -> Result<StatusCode> {
        let response = router()?
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(body))?,
            )
            .await?;
        assert!(response.headers().get(SET_COOKIE).is_none());
        Ok(response.status())
    }

    #[tokio::test]
    async fn login_missing_password() -> Result<()> {
        assert_eq!(
            post_login(r#"{"login":"admin"}"#).await?,
            StatusCode::BAD_REQUEST
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_empty_fields() -> Result<()> {
        assert_eq!(
            post_login(r#"{"login":"","password":""}"#).await?,
            StatusCode::BAD_REQUEST
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_invalid_json() -> Result<()> {
        assert_eq!(post_login("{not json").await?, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn login_without_body() -> Result<()> {
        let response = router()?
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
