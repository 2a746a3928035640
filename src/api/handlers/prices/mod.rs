//! Price lists for ceiling materials and services.
//!
//! `GET /prices` is public. Creating, updating and deleting rows requires an admin
//! session. Each write is a single statement; updates and deletes that match no
//! row answer `404`.

mod storage;
pub(crate) mod types;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
};
use sqlx::PgPool;
use tracing::info;

pub use self::storage::Catalog;
use self::{
    storage::{delete_item, insert_item, list_items, update_item},
    types::{CreatedResponse, DeletePriceRequest, PriceList, PriceRequest},
};
use super::{MessageResponse, auth::AdminIdentity, json_body};
use crate::api::error::ApiError;

#[utoipa::path(
    get,
    path = "/prices",
    responses(
        (status = 200, description = "Materials and services ordered by id", body = PriceList),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    tag = "prices"
)]
pub async fn list_prices(pool: Extension<PgPool>) -> Result<Json<PriceList>, ApiError> {
    let ceiling_materials = list_items(&pool, Catalog::Material).await?;
    let services = list_items(&pool, Catalog::Service).await?;

    Ok(Json(PriceList {
        ceiling_materials,
        services,
    }))
}

async fn create(
    pool: &PgPool,
    catalog: Catalog,
    admin: &AdminIdentity,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let request = json_body(payload, || {
        ApiError::validation(format!("missing {} data", catalog.label().to_lowercase()))
    })?;
    let (_, fields) = request.fields()?;

    let id = insert_item(pool, catalog, &fields).await?;
    info!(login = %admin.login, catalog = catalog.label(), id, "price created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: format!("{} created.", catalog.label()),
            id,
        }),
    ))
}

async fn update(
    pool: &PgPool,
    catalog: Catalog,
    admin: &AdminIdentity,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = json_body(payload, || {
        ApiError::validation("Not all necessary data for update were provided")
    })?;
    let (id, fields) = request.fields()?;
    let id = id.ok_or_else(|| ApiError::validation("id is required"))?;

    if !update_item(pool, catalog, id, &fields).await? {
        return Err(ApiError::not_found("Record not found in database"));
    }
    info!(login = %admin.login, catalog = catalog.label(), id, "price updated");

    Ok(MessageResponse::new(format!(
        "{} {} successfully updated.",
        catalog.label(),
        fields.name
    )))
}

async fn delete(
    pool: &PgPool,
    catalog: Catalog,
    admin: &AdminIdentity,
    payload: Result<Json<DeletePriceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = json_body(payload, || ApiError::validation("id is required"))?;
    let id = request
        .id
        .ok_or_else(|| ApiError::validation("id is required"))?;

    if !delete_item(pool, catalog, id).await? {
        return Err(ApiError::not_found("Record not found in database"));
    }
    info!(login = %admin.login, catalog = catalog.label(), id, "price deleted");

    Ok(MessageResponse::new("Record successfully deleted"))
}

#[utoipa::path(
    post,
    path = "/prices/material",
    request_body = PriceRequest,
    responses(
        (status = 201, description = "Material created", body = CreatedResponse),
        (status = 400, description = "Missing material data", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "prices"
)]
pub async fn create_material(
    pool: Extension<PgPool>,
    Extension(admin): Extension<AdminIdentity>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    create(&pool, Catalog::Material, &admin, payload).await
}

#[utoipa::path(
    patch,
    path = "/prices/material",
    request_body = PriceRequest,
    responses(
        (status = 200, description = "Material updated", body = MessageResponse),
        (status = 400, description = "Missing material data", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 404, description = "No material with this id", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "prices"
)]
pub async fn update_material(
    pool: Extension<PgPool>,
    Extension(admin): Extension<AdminIdentity>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    update(&pool, Catalog::Material, &admin, payload).await
}

#[utoipa::path(
    delete,
    path = "/prices/material",
    request_body = DeletePriceRequest,
    responses(
        (status = 200, description = "Material deleted", body = MessageResponse),
        (status = 400, description = "Missing id", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 404, description = "No material with this id", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "prices"
)]
pub async fn delete_material(
    pool: Extension<PgPool>,
    Extension(admin): Extension<AdminIdentity>,
    payload: Result<Json<DeletePriceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete(&pool, Catalog::Material, &admin, payload).await
}

#[utoipa::path(
    post,
    path = "/prices/service",
    request_body = PriceRequest,
    responses(
        (status = 201, description = "Service created", body = CreatedResponse),
        (status = 400, description = "Missing service data", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "prices"
)]
pub async fn create_service(
    pool: Extension<PgPool>,
    Extension(admin): Extension<AdminIdentity>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    create(&pool, Catalog::Service, &admin, payload).await
}

#[utoipa::path(
    patch,
    path = "/prices/service",
    request_body = PriceRequest,
    responses(
        (status = 200, description = "Service updated", body = MessageResponse),
        (status = 400, description = "Missing service data", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 404, description = "No service with this id", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "prices"
)]
pub async fn update_service(
    pool: Extension<PgPool>,
    Extension(admin): Extension<AdminIdentity>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    update(&pool, Catalog::Service, &admin, payload).await
}

#[utoipa::path(
    delete,
    path = "/prices/service",
    request_body = DeletePriceRequest,
    responses(
        (status = 200, description = "Service deleted", body = MessageResponse),
        (status = 400, description = "Missing id", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 404, description = "No service with this id", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "prices"
)]
pub async fn delete_service(
    pool: Extension<PgPool>,
    Extension(admin): Extension<AdminIdentity>,
    payload: Result<Json<DeletePriceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    delete(&pool, Catalog::Service, &admin, payload).await
}
