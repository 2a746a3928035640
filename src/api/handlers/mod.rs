pub mod auth;
pub mod health;
pub mod prices;
pub mod site;
pub mod slider;

// common functions for the handlers
use axum::{Json, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::api::error::ApiError;

/// Plain acknowledgement body, `{"message": "..."}`.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Unwrap a JSON body, mapping a missing or unreadable body to `on_missing`.
pub(crate) fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    on_missing: impl FnOnce() -> ApiError,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "rejected request body");
            Err(on_missing())
        }
    }
}

/// A text field counts as present only when it holds something besides whitespace.
pub(crate) fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank() {
        assert_eq!(required_text(None), None);
        assert_eq!(required_text(Some(String::new())), None);
        assert_eq!(required_text(Some("  ".to_string())), None);
        assert_eq!(
            required_text(Some("Satin".to_string())).as_deref(),
            Some("Satin")
        );
    }

    #[test]
    fn json_body_maps_rejection() {
        let ok: Result<Json<u8>, JsonRejection> = Ok(Json(7));
        assert!(matches!(json_body(ok, || ApiError::MissingCredentials), Ok(7)));
    }
}
