use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login form. Fields are optional so that a missing field maps to
/// `MissingCredentials` instead of a deserialization error.
#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub login: String,
    /// Session expiry, milliseconds since the Unix epoch.
    pub expires_at: u64,
}
