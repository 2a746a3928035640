//! Administrator authentication.
//!
//! A single administrator logs in with `POST /login`. On success the server sets
//! the `userLogin` cookie, a self-contained token signed with HMAC-SHA256 under the
//! configured cookie secret. Protected routes are wrapped in [`require_admin`],
//! which verifies the token on every request.
//!
//! ## Session lifetime
//!
//! Tokens expire exactly one hour after issuance. There is no logout and no
//! server side revocation; rotating the cookie secret invalidates every token.

pub(crate) mod gate;
pub(crate) mod login;
mod password;
pub(crate) mod session;
mod state;
mod storage;
pub(crate) mod types;

pub use gate::{AdminIdentity, require_admin};
pub use password::PasswordHasher;
pub use state::{AuthConfig, AuthState};
