//! Auth state and configuration shared by the login handler and the admin gate.

use secrecy::{ExposeSecret, SecretString};

use super::password::PasswordHasher;

#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    cookie_secure: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the `Secure` attribute to the session cookie.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

/// Process-wide auth state, shared through an `Extension<Arc<AuthState>>` layer.
///
/// The server only verifies digests; bcrypt reads the cost from the digest itself.
pub struct AuthState {
    config: AuthConfig,
    cookie_secret: SecretString,
    hasher: PasswordHasher,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, cookie_secret: SecretString) -> Self {
        let hasher = PasswordHasher::default();
        Self {
            config,
            cookie_secret,
            hasher,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Raw HMAC key for session tokens.
    pub(crate) fn secret(&self) -> &[u8] {
        self.cookie_secret.expose_secret().as_bytes()
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .field("cookie_secret", &"[REDACTED]")
            .field("hasher", &self.hasher)
            .finish()
    }
}
