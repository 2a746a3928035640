//! Database helpers for the `materials` and `services` catalogs.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::types::{PriceFields, PriceItem};

/// The two price catalogs. Both tables share one shape, so every statement is
/// fixed per catalog and only values are bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Catalog {
    Material,
    Service,
}

impl Catalog {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Material => "Material",
            Self::Service => "Service",
        }
    }

    const fn select_sql(self) -> &'static str {
        match self {
            Self::Material => "SELECT id, name, price, description FROM materials ORDER BY id",
            Self::Service => "SELECT id, name, price, description FROM services ORDER BY id",
        }
    }

    const fn insert_sql(self) -> &'static str {
        match self {
            Self::Material => {
                "INSERT INTO materials (name, price, description) VALUES ($1, $2, $3) RETURNING id"
            }
            Self::Service => {
                "INSERT INTO services (name, price, description) VALUES ($1, $2, $3) RETURNING id"
            }
        }
    }

    const fn update_sql(self) -> &'static str {
        match self {
            Self::Material => {
                "UPDATE materials SET name = $1, price = $2, description = $3 WHERE id = $4"
            }
            Self::Service => {
                "UPDATE services SET name = $1, price = $2, description = $3 WHERE id = $4"
            }
        }
    }

    const fn delete_sql(self) -> &'static str {
        match self {
            Self::Material => "DELETE FROM materials WHERE id = $1",
            Self::Service => "DELETE FROM services WHERE id = $1",
        }
    }
}

pub(super) async fn list_items(pool: &PgPool, catalog: Catalog) -> Result<Vec<PriceItem>> {
    let query = catalog.select_sql();
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
        .with_context(|| format!("failed to list {} prices", catalog.label()))?;

    Ok(rows
        .into_iter()
        .map(|row| PriceItem {
            id: row.get("id"),
            name: row.get("name"),
            price: row.get("price"),
            description: row.get("description"),
        })
        .collect())
}

/// Insert a row and return its id.
pub(super) async fn insert_item(
    pool: &PgPool,
    catalog: Catalog,
    fields: &PriceFields,
) -> Result<i64> {
    let query = catalog.insert_sql();
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.description)
        .fetch_one(pool)
        .instrument(span)
        .await
        .with_context(|| format!("failed to insert {}", catalog.label()))?;

    Ok(row.get("id"))
}

/// Overwrite a row; returns `false` when no row has `id`.
pub(super) async fn update_item(
    pool: &PgPool,
    catalog: Catalog,
    id: i64,
    fields: &PriceFields,
) -> Result<bool> {
    let query = catalog.update_sql();
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.description)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await
        .with_context(|| format!("failed to update {} {id}", catalog.label()))?;

    Ok(result.rows_affected() > 0)
}

/// Delete a row; returns `false` when no row has `id`.
pub(super) async fn delete_item(pool: &PgPool, catalog: Catalog, id: i64) -> Result<bool> {
    let query = catalog.delete_sql();
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await
        .with_context(|| format!("failed to delete {} {id}", catalog.label()))?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_target_their_table() {
        for (catalog, table) in [(Catalog::Material, "materials"), (Catalog::Service, "services")] {
            for sql in [
                catalog.select_sql(),
                catalog.insert_sql(),
                catalog.update_sql(),
                catalog.delete_sql(),
            ] {
                assert!(sql.contains(table), "{sql} does not use {table}");
            }
        }
    }
}
