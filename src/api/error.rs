//! API error taxonomy and its HTTP mapping.
//!
//! Every error response is a JSON object `{"error": "<Kind>", "message": "..."}`.
//! Internal errors are logged with their full context chain and reach the client
//! only as a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Login and password fields required")]
    MissingCredentials,
    #[error("Cannot find user login in database")]
    NotFound,
    #[error("Incorrect password or login")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthorized,
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundResource(String),
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingCredentials | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::NotFoundResource(_) => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind, sent as the `error` field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "MissingCredentials",
            Self::NotFound => "NotFound",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::Unauthorized => "Unauthorized",
            Self::ValidationError(_) => "ValidationError",
            Self::NotFoundResource(_) => "NotFoundResource",
            Self::InternalError(_) => "InternalError",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundResource(message.into())
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::InternalError(err) = &self {
            error!(error = %err, details = ?err, "request failed");
        }

        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> Result<(StatusCode, ErrorBody)> {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    #[tokio::test]
    async fn invalid_credentials_maps_to_401() -> Result<()> {
        let (status, body) = body_of(ApiError::InvalidCredentials).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "InvalidCredentials");
        Ok(())
    }

    #[tokio::test]
    async fn validation_error_keeps_message() -> Result<()> {
        let (status, body) = body_of(ApiError::validation("missing material data")).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "ValidationError");
        assert_eq!(body.message, "missing material data");
        Ok(())
    }

    #[tokio::test]
    async fn internal_error_hides_details() -> Result<()> {
        let err = anyhow!("relation \"users\" does not exist");
        let (status, body) = body_of(ApiError::from(err)).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "InternalError");
        assert!(!body.message.contains("users"));
        Ok(())
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ApiError::MissingCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::not_found("Record not found").status(),
            StatusCode::NOT_FOUND
        );
    }
}
