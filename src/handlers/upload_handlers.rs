//! `POST /api/upload` — photo ingestion for information records.

use crate::{
    errors::AppError,
    services::upload_service::{UploadError, UploadedFile},
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use serde::Serialize;
use tracing::{debug, info};

/// Multipart field carrying the photos.
pub const PHOTOS_FIELD: &str = "photos";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub files: Vec<String>,
    pub message: String,
}

/// Store every file part of the `photos` field and return their public paths.
pub async fn upload_photos(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|err| AppError::bad_request(err.body_text()))?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::new(err.status(), err.body_text()))?
    {
        if field.name() != Some(PHOTOS_FIELD) {
            continue;
        }
        // Plain text values under the same name are not files.
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            debug!("ignoring non-file `{}` part", PHOTOS_FIELD);
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::new(err.status(), err.body_text()))?;
        files.push(UploadedFile {
            file_name: Some(file_name),
            bytes,
        });
    }

    let stored = state
        .uploads
        .store_all(files)
        .await
        .map_err(|err| match err {
            UploadError::NoFiles => AppError::bad_request("No files uploaded"),
            UploadError::Io(err) => AppError::internal_logged("failed to store uploaded photos", err),
        })?;

    info!(count = stored.len(), "stored uploaded photos");

    Ok(Json(UploadResponse {
        success: true,
        message: format!("{} file(s) uploaded successfully", stored.len()),
        files: stored,
    }))
}
