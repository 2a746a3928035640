//! Database helpers for the administrator account.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;

/// Look up the stored bcrypt digest for `login`.
pub(super) async fn lookup_password_digest(pool: &PgPool, login: &str) -> Result<Option<String>> {
    let query = "SELECT password FROM users WHERE login = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(login)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user")?;

    Ok(row.map(|row| row.get::<String, _>("password")))
}
