use crate::api::handlers::auth::PasswordHasher;
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader};

const ENV_ADMIN_PASSWORD: &str = "SHOWROOM_ADMIN_PASSWORD";

#[derive(Debug)]
pub struct Args {
    pub cost: u32,
}

/// Print the bcrypt digest of the administrator password.
///
/// The digest is meant to be inserted into `users.password` by hand; the API
/// never creates users.
/// # Errors
/// Returns an error if no password is provided or hashing fails.
pub async fn execute(args: Args) -> Result<()> {
    let password = read_password().await?;

    let digest = PasswordHasher::new(args.cost)
        .hash(password)
        .await
        .context("Failed to hash password")?;

    println!("{digest}");

    Ok(())
}

async fn read_password() -> Result<SecretString> {
    if let Ok(password) = env::var(ENV_ADMIN_PASSWORD) {
        return non_empty(password);
    }

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read password from stdin")?;

    non_empty(line.trim_end_matches(['\r', '\n']).to_string())
}

fn non_empty(password: String) -> Result<SecretString> {
    if password.is_empty() {
        return Err(anyhow!(
            "empty password: set {ENV_ADMIN_PASSWORD} or pipe it on stdin"
        ));
    }
    Ok(SecretString::from(password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn non_empty_rejects_blank_password() {
        assert!(non_empty(String::new()).is_err());
    }

    #[test]
    fn non_empty_keeps_password() {
        let secret = non_empty("correct".to_string());
        assert!(matches!(secret, Ok(ref s) if s.expose_secret() == "correct"));
    }
}
