//! Database helpers for site settings and contacts.

use anyhow::{Context, Result, bail};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{Instrument, error};

use super::types::{ContactRow, SettingRow, SiteUpdate};

const UPDATE_CONTACT: &str = "UPDATE contacts SET value = $1 WHERE type = $2";
const UPDATE_SETTING: &str = "UPDATE settings SET value = $1 WHERE name = $2";

pub(super) async fn load_settings(pool: &PgPool) -> Result<Vec<SettingRow>> {
    let query = "SELECT id, name, value FROM settings ORDER BY id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to load settings")?;

    Ok(rows
        .into_iter()
        .map(|row| SettingRow {
            id: row.get("id"),
            name: row.get("name"),
            value: row.get("value"),
        })
        .collect())
}

pub(super) async fn load_contacts(pool: &PgPool) -> Result<Vec<ContactRow>> {
    let query = "SELECT id, type, value FROM contacts ORDER BY id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to load contacts")?;

    Ok(rows
        .into_iter()
        .map(|row| ContactRow {
            id: row.get("id"),
            kind: row.get("type"),
            value: row.get("value"),
        })
        .collect())
}

/// Write the three contacts and the calculator flag atomically.
///
/// Each statement must match exactly one row. Any failure rolls the transaction
/// back, so readers observe either all old or all new values.
pub(super) async fn update_site_data(pool: &PgPool, update: &SiteUpdate) -> Result<()> {
    let statements = [
        (UPDATE_CONTACT, "PhoneNumber", update.phone.as_str()),
        (UPDATE_CONTACT, "Email", update.email.as_str()),
        (UPDATE_CONTACT, "Facebook", update.facebook.as_str()),
        (
            UPDATE_SETTING,
            "isCalculatorVisible",
            update.calculator_visible_value(),
        ),
    ];

    let mut tx = pool
        .begin()
        .await
        .context("failed to begin site update transaction")?;

    for (query, key, value) in statements {
        if let Err(err) = update_one(&mut tx, query, key, value).await {
            if let Err(rollback_err) = tx.rollback().await {
                error!("Failed to roll back site update: {}", rollback_err);
            }
            return Err(err);
        }
    }

    tx.commit()
        .await
        .context("failed to commit site update transaction")
}

async fn update_one(
    tx: &mut Transaction<'_, Postgres>,
    query: &'static str,
    key: &str,
    value: &str,
) -> Result<()> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(value)
        .bind(key)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .with_context(|| format!("failed to update {key}"))?;

    if result.rows_affected() != 1 {
        bail!(
            "expected to update one row for {key}, updated {}",
            result.rows_affected()
        );
    }

    Ok(())
}
