//! Site content: settings, contacts and the slider image list.
//!
//! `GET /` is public and feeds the landing page. `GET /admin` returns the same data
//! for the control panel together with the signed-in login. `PATCH /admin/site`
//! updates the contacts and the calculator flag in one transaction.

mod storage;
pub(crate) mod types;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use self::{
    storage::{load_contacts, load_settings, update_site_data},
    types::{ContactRow, DashboardData, SettingRow, SiteData, SiteUpdate, UpdateSiteRequest},
};
use super::{MessageResponse, auth::AdminIdentity, json_body, slider::SliderStore};
use crate::api::error::ApiError;

struct SiteContent {
    settings: Vec<SettingRow>,
    contacts: Vec<ContactRow>,
    slider_img_list: Vec<String>,
}

async fn load_site_content(pool: &PgPool, slider: &SliderStore) -> Result<SiteContent, ApiError> {
    let slider_img_list = slider.list().await?;
    let settings = load_settings(pool).await?;
    let contacts = load_contacts(pool).await?;

    if settings.is_empty() || contacts.is_empty() {
        return Err(ApiError::not_found("Site settings not found"));
    }

    Ok(SiteContent {
        settings,
        contacts,
        slider_img_list,
    })
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page data", body = SiteData),
        (status = 404, description = "Site settings not found", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    tag = "site"
)]
pub async fn site_data(
    pool: Extension<PgPool>,
    slider: Extension<Arc<SliderStore>>,
) -> Result<Json<SiteData>, ApiError> {
    let content = load_site_content(&pool, &slider).await?;

    Ok(Json(SiteData {
        settings: content.settings,
        contacts: content.contacts,
        slider_img_list: content.slider_img_list,
    }))
}

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Control panel data", body = DashboardData),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 404, description = "Site settings not found", body = crate::api::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "site"
)]
pub async fn admin_dashboard(
    pool: Extension<PgPool>,
    slider: Extension<Arc<SliderStore>>,
    Extension(admin): Extension<AdminIdentity>,
) -> Result<Json<DashboardData>, ApiError> {
    let content = load_site_content(&pool, &slider).await?;

    Ok(Json(DashboardData {
        settings: content.settings,
        contacts: content.contacts,
        slider_img_list: content.slider_img_list,
        login: admin.login,
    }))
}

#[utoipa::path(
    patch,
    path = "/admin/site",
    request_body = UpdateSiteRequest,
    responses(
        (status = 201, description = "Contacts and settings updated", body = MessageResponse),
        (status = 400, description = "Missing data to update", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 500, description = "Update rolled back", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "site"
)]
pub async fn update_site(
    pool: Extension<PgPool>,
    Extension(admin): Extension<AdminIdentity>,
    payload: Result<Json<UpdateSiteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let request = json_body(payload, || ApiError::validation("missing data to update"))?;
    let update = SiteUpdate::try_from(request)?;

    update_site_data(&pool, &update).await?;

    info!(login = %admin.login, "site settings updated");

    Ok((StatusCode::CREATED, MessageResponse::new("Updated")))
}
