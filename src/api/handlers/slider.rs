//! Slider images: a flat directory of files served under `/SliderImages`.
//!
//! Images are stored under the name they were uploaded with, so the name is the
//! only key. Names that could escape the directory are rejected up front.

use anyhow::{Context, Result};
use axum::{
    Json,
    extract::{Extension, Multipart, Path, multipart::MultipartRejection},
};
use regex::Regex;
use std::{
    io::ErrorKind,
    path::{Path as FsPath, PathBuf},
    sync::Arc,
};
use tracing::{debug, info};
use utoipa::ToSchema;

use super::{MessageResponse, auth::AdminIdentity};
use crate::api::error::ApiError;

pub const UPLOAD_FIELD: &str = "image";
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// A file name is acceptable when it stays inside the slider directory: no path
/// separators, no `..`, no leading dot.
#[must_use]
pub fn valid_image_name(name: &str) -> bool {
    name.len() <= 255
        && !name.contains("..")
        && Regex::new(r"^[^./\\\x00][^/\\\x00]*$").is_ok_and(|re| re.is_match(name))
}

#[must_use]
pub fn allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

#[derive(Clone, Debug)]
pub struct SliderStore {
    dir: PathBuf,
}

impl SliderStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &FsPath {
        &self.dir
    }

    /// Create the directory if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create slider directory {}", self.dir.display()))
    }

    /// Sorted names of the regular files in the directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("failed to read slider directory {}", self.dir.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("failed to read slider directory entry")?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();

        Ok(names)
    }

    /// Store `bytes` as `name`, replacing any file with the same name.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write slider image {}", path.display()))
    }

    /// Remove `name`; returns `false` when there was nothing to remove.
    ///
    /// # Errors
    /// Returns an error for any failure other than a missing file.
    pub async fn remove(&self, name: &str) -> Result<bool> {
        let path = self.dir.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err)
                .with_context(|| format!("failed to remove slider image {}", path.display())),
        }
    }
}

/// Multipart form accepted by the upload endpoint.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct SliderImageUpload {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/admin/sliderImage",
    request_body(content = SliderImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image uploaded", body = MessageResponse),
        (status = 400, description = "Missing image, bad name or unsupported type", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 500, description = "Image could not be stored", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "slider"
)]
pub async fn upload_slider_image(
    slider: Extension<Arc<SliderStore>>,
    Extension(admin): Extension<AdminIdentity>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut multipart =
        multipart.map_err(|_| ApiError::validation("multipart form with an image field required"))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::validation(format!("failed to read form: {}", err.body_text())))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !allowed_image_type(&content_type) {
            debug!(%content_type, "rejected slider image type");
            return Err(ApiError::validation("this image type is not allowed"));
        }

        let name = field.file_name().unwrap_or_default().to_string();
        if !valid_image_name(&name) {
            return Err(ApiError::validation("invalid image file name"));
        }

        let bytes = field.bytes().await.map_err(|err| {
            ApiError::validation(format!("failed to read image: {}", err.body_text()))
        })?;

        slider.save(&name, &bytes).await?;
        info!(login = %admin.login, image = %name, size = bytes.len(), "slider image uploaded");

        return Ok(MessageResponse::new("Image uploaded successfully"));
    }

    Err(ApiError::validation("image field required"))
}

#[utoipa::path(
    delete,
    path = "/admin/sliderImage/{imageName}",
    params(
        ("imageName" = String, Path, description = "File name of the slider image")
    ),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 400, description = "Invalid image name", body = crate::api::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::api::error::ErrorBody),
        (status = 404, description = "Image not found", body = crate::api::error::ErrorBody)
    ),
    security(("userLogin" = [])),
    tag = "slider"
)]
pub async fn delete_slider_image(
    slider: Extension<Arc<SliderStore>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(image_name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !valid_image_name(&image_name) {
        return Err(ApiError::validation("invalid image name"));
    }

    if !slider.remove(&image_name).await? {
        return Err(ApiError::not_found("Image not found."));
    }

    info!(login = %admin.login, image = %image_name, "slider image deleted");

    Ok(MessageResponse::new("Image has been deleted."))
}
