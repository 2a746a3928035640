//! Password hashing for the administrator account.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

/// Matches the cost the admin digests were historically provisioned with.
const DEFAULT_BCRYPT_COST: u32 = 10;

/// Adaptive one-way hash (`bcrypt`) with a configurable work factor.
///
/// Hashing and verification are CPU bound and run on the blocking pool.
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// Returns an error if the cost is out of range or the blocking task fails.
    pub async fn hash(&self, password: SecretString) -> Result<String> {
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password.expose_secret(), cost))
            .await
            .context("password hashing task failed")?
            .context("failed to hash password")
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable digest is an error.
    ///
    /// # Errors
    /// Returns an error if the digest is malformed or the blocking task fails.
    pub async fn verify(&self, password: SecretString, digest: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password.expose_secret(), &digest))
            .await
            .context("password verification task failed")?
            .context("stored password digest is not a valid bcrypt hash")
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lowest cost bcrypt accepts; keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_then_verify_matches() -> Result<()> {
        let hasher = PasswordHasher::new(TEST_COST);
        let digest = hasher.hash(SecretString::from("correct")).await?;

        assert!(digest.starts_with("$2"));
        assert!(!digest.contains("correct"));
        assert!(
            hasher
                .verify(SecretString::from("correct"), digest.clone())
                .await?
        );
        assert!(!hasher.verify(SecretString::from("wrong"), digest).await?);
        Ok(())
    }

    #[tokio::test]
    async fn hash_is_salted() -> Result<()> {
        let hasher = PasswordHasher::new(TEST_COST);
        let first = hasher.hash(SecretString::from("correct")).await?;
        let second = hasher.hash(SecretString::from("correct")).await?;
        assert_ne!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn digest_records_cost() -> Result<()> {
        let digest = PasswordHasher::default()
            .hash(SecretString::from("correct"))
            .await?;
        assert!(digest.contains("$10$"));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_digest_is_an_error() {
        let result = PasswordHasher::new(TEST_COST)
            .verify(SecretString::from("correct"), "not-a-hash".to_string())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn invalid_cost_is_an_error() {
        let result = PasswordHasher::new(2)
            .hash(SecretString::from("correct"))
            .await;
        assert!(result.is_err());
    }
}
