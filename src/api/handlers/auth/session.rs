//! Stateless session tokens carried in the `userLogin` cookie.
//!
//! Token layout: `base64url(payload) "." base64url(HMAC-SHA256(secret, base64url(payload)))`
//! where the payload is `{"login": .., "iat": .., "exp": ..}` in milliseconds since the
//! Unix epoch. Nothing is stored server side; a token is valid while its MAC verifies and
//! `now < exp`.

use anyhow::{Context, Result};
use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE_NAME: &str = "userLogin";
pub const SESSION_MAX_AGE_MS: u64 = 3_600_000;

/// Claims bound by the token signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub login: String,
    #[serde(rename = "iat")]
    pub issued_at_ms: u64,
    #[serde(rename = "exp")]
    pub expires_at_ms: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("session cookie is missing")]
    Missing,
    #[error("session cookie is malformed")]
    Malformed,
    #[error("session cookie signature does not verify")]
    BadSignature,
    #[error("session expired")]
    Expired,
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Mint a signed token for `login`, valid for one hour from `now_ms`.
///
/// # Errors
/// Returns an error if the claims cannot be serialized or the key is rejected.
pub fn issue(login: &str, secret: &[u8], now_ms: u64) -> Result<(String, Session)> {
    let session = Session {
        login: login.to_string(),
        issued_at_ms: now_ms,
        expires_at_ms: now_ms.saturating_add(SESSION_MAX_AGE_MS),
    };

    let claims = serde_json::to_vec(&session).context("failed to serialize session claims")?;
    let payload = Base64UrlUnpadded::encode_string(&claims);

    let mut mac = HmacSha256::new_from_slice(secret).context("invalid session key")?;
    mac.update(payload.as_bytes());
    let signature = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

    Ok((format!("{payload}.{signature}"), session))
}

/// Verify a token and return its claims.
///
/// The MAC is checked in constant time over the encoded payload before anything in
/// the payload is parsed.
///
/// # Errors
/// Returns [`AuthError`] when the token is malformed, tampered with or expired.
pub fn verify(token: &str, secret: &[u8], now_ms: u64) -> Result<Session, AuthError> {
    let (payload, signature) = token.split_once('.').ok_or(AuthError::Malformed)?;
    let signature = Base64UrlUnpadded::decode_vec(signature).map_err(|_| AuthError::Malformed)?;

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| AuthError::BadSignature)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AuthError::BadSignature)?;

    let claims = Base64UrlUnpadded::decode_vec(payload).map_err(|_| AuthError::Malformed)?;
    let session: Session = serde_json::from_slice(&claims).map_err(|_| AuthError::Malformed)?;

    if session.login.is_empty() {
        return Err(AuthError::Malformed);
    }
    if now_ms >= session.expires_at_ms {
        return Err(AuthError::Expired);
    }

    Ok(session)
}

/// Build the `Set-Cookie` value for a freshly issued token.
pub(crate) fn session_cookie(token: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age_seconds = SESSION_MAX_AGE_MS / 1000;
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Find the session token in the `Cookie` headers, if any.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn issued_token_verifies_to_login() {
        let (token, issued) = issue("admin", SECRET, NOW).unwrap();
        let session = verify(&token, SECRET, NOW + 1).unwrap();

        assert_eq!(session, issued);
        assert_eq!(session.login, "admin");
        assert_eq!(session.issued_at_ms, NOW);
        assert_eq!(session.expires_at_ms, NOW + 3_600_000);
    }

    #[test]
    fn token_expires_after_one_hour() {
        let (token, _) = issue("admin", SECRET, NOW).unwrap();

        assert!(verify(&token, SECRET, NOW + SESSION_MAX_AGE_MS - 1).is_ok());
        assert_eq!(
            verify(&token, SECRET, NOW + SESSION_MAX_AGE_MS),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = issue("admin", SECRET, NOW).unwrap();
        assert_eq!(
            verify(&token, b"another-secret-another-secret-xx", NOW),
            Err(AuthError::BadSignature)
        );
    }

    #[test]
    fn tampered_login_is_rejected() {
        let (token, _) = issue("admin", SECRET, NOW).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged = Session {
            login: "intruder".to_string(),
            issued_at_ms: NOW,
            expires_at_ms: NOW + SESSION_MAX_AGE_MS,
        };
        let forged_payload =
            Base64UrlUnpadded::encode_string(&serde_json::to_vec(&forged).unwrap());

        assert_eq!(
            verify(&format!("{forged_payload}.{signature}"), SECRET, NOW),
            Err(AuthError::BadSignature)
        );
    }

    #[test]
    fn extended_expiry_is_rejected() {
        let (token, session) = issue("admin", SECRET, NOW).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let extended = Session {
            expires_at_ms: session.expires_at_ms + SESSION_MAX_AGE_MS * 24,
            ..session
        };
        let payload = Base64UrlUnpadded::encode_string(&serde_json::to_vec(&extended).unwrap());

        assert_eq!(
            verify(&format!("{payload}.{signature}"), SECRET, NOW),
            Err(AuthError::BadSignature)
        );
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for token in ["", "admin", "no-dot-here", "a.b.c", "!!!.???"] {
            assert!(verify(token, SECRET, NOW).is_err(), "accepted {token:?}");
        }
    }

    #[test]
    fn plain_login_cookie_is_rejected() {
        // An unsigned `userLogin=admin` cookie must never authenticate.
        assert_eq!(verify("admin", SECRET, NOW), Err(AuthError::Malformed));
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc.def", false).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("userLogin=abc.def;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie("abc.def", true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn extract_session_token_finds_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; userLogin=abc.def; lang=uk"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn extract_session_token_ignores_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; userLogin="));
        assert_eq!(extract_session_token(&headers), None);
        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }
}
