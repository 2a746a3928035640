//! Shared fixtures for handler tests.
//!
//! Database-backed tests start a throwaway Postgres container, apply
//! `sql/schema.sql`, and drive the full router. They are `#[ignore]`d so a plain
//! `cargo test` lists them as ignored; `cargo test -- --include-ignored` runs them
//! and fails when no container runtime is reachable.

use anyhow::{Context, Result};
use axum::{Router, http::HeaderValue};
use secrecy::SecretString;
use sqlx::{Connection, PgConnection, PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use test_support::{TestNetwork, postgres::PostgresContainer, runtime};
use ulid::Ulid;

use super::handlers::{
    auth::{AuthConfig, AuthState, PasswordHasher, session},
    slider::SliderStore,
};

const SHOWROOM_SCHEMA_SQL: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

pub(crate) const TEST_SECRET: &str = "test-cookie-secret-0123456789abcdef";
pub(crate) const TEST_ORIGIN: &str = "https://showroom.example";

pub(crate) struct TestDb {
    _postgres: PostgresContainer,
    pub(crate) pool: PgPool,
}

impl TestDb {
    /// Creates a fresh ephemeral database by starting a `PostgresContainer` and applying the schema.
    pub(crate) async fn new() -> Result<Self> {
        runtime::ensure_container_runtime().context("no container runtime for database tests")?;

        let network = TestNetwork::new("showroom");
        let postgres = PostgresContainer::start(network.name()).await?;
        postgres.wait_until_ready().await?;
        apply_schema(&postgres).await?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&postgres.admin_dsn())
            .await
            .context("failed to connect test pool")?;

        Ok(Self {
            _postgres: postgres,
            pool,
        })
    }
}

async fn apply_schema(postgres: &PostgresContainer) -> Result<()> {
    let mut connection = PgConnection::connect(&postgres.admin_dsn())
        .await
        .context("failed to connect for schema setup")?;

    for (index, statement) in split_sql_statements(SHOWROOM_SCHEMA_SQL)
        .iter()
        .enumerate()
    {
        sqlx::query(statement)
            .execute(&mut connection)
            .await
            .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
    }

    Ok(())
}

/// Splits a schema file into statements; assumes each ends with `;` at the end of a line.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

/// Inserts the administrator with a low-cost bcrypt digest of `password`.
pub(crate) async fn insert_admin(pool: &PgPool, login: &str, password: &str) -> Result<()> {
    let digest = PasswordHasher::new(4)
        .hash(SecretString::from(password))
        .await?;
    sqlx::query("INSERT INTO users (login, password) VALUES ($1, $2)")
        .bind(login)
        .bind(digest)
        .execute(pool)
        .await
        .context("insert admin")?;
    Ok(())
}

pub(crate) fn auth_state() -> Arc<AuthState> {
    Arc::new(AuthState::new(
        AuthConfig::new(),
        SecretString::from(TEST_SECRET),
    ))
}

/// `Cookie` header value carrying a fresh session for `login`.
pub(crate) fn session_cookie(login: &str) -> Result<String> {
    let (token, _) = session::issue(login, TEST_SECRET.as_bytes(), session::now_ms())?;
    Ok(format!("{}={token}", session::SESSION_COOKIE_NAME))
}

/// A slider store in a fresh temporary directory.
pub(crate) async fn slider_store() -> Result<Arc<SliderStore>> {
    let store = SliderStore::new(std::env::temp_dir().join(format!("showroom-test-{}", Ulid::new())));
    store.ensure_dir().await?;
    Ok(Arc::new(store))
}

/// The production router wired to `pool` and `slider`.
pub(crate) fn app(pool: PgPool, slider: Arc<SliderStore>) -> Router {
    super::app(
        pool,
        auth_state(),
        slider,
        HeaderValue::from_static(TEST_ORIGIN),
        1024 * 1024,
    )
}

/// A pool that is never connected; for paths that must not reach the database.
pub(crate) fn lazy_pool() -> Result<PgPool> {
    Ok(PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?)
}

mod tests {
    use super::split_sql_statements;

    #[test]
    fn schema_splits_into_statements() {
        let statements = split_sql_statements(super::SHOWROOM_SCHEMA_SQL);
        assert!(statements.iter().any(|s| s.starts_with("CREATE TABLE IF NOT EXISTS users")));
        assert!(statements.iter().all(|s| s.ends_with(';')));
        assert_eq!(statements.len(), 7);
    }
}
