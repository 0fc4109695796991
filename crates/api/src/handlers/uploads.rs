//! Image upload and deletion for the admin panel.
//!
//! Uploads are decoded, downscaled to 800 px wide at most and re-encoded as
//! JPEG before they are stored under `<folder>/<unix-millis>.jpg`.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use convex_core::media::{
    compress_image, is_accepted_content_type, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_WIDTH,
};
use convex_core::storage::{key_from_url, object_key, ImageFolder};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
    pub key: String,
    pub width: u32,
    pub height: u32,
}

/// Request body for `DELETE /admin/uploads`.
#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteImageResponse {
    /// `false` when the URL is not in the bucket or nothing was stored there.
    pub deleted: bool,
}

/// POST /api/v1/admin/uploads
///
/// Multipart form with a required `file` field and an optional `folder`
/// field (`projects` by default).
pub async fn upload_image(
    _admin: AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadedImage>>)> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut folder = ImageFolder::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((content_type, data.to_vec()));
            }
            "folder" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                folder = text.trim().parse()?;
            }
            _ => {}
        }
    }

    let (content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    if !is_accepted_content_type(&content_type) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image type '{content_type}'. Use JPEG, PNG, WebP or GIF"
        )));
    }

    let original_size = data.len();
    let compressed = tokio::task::spawn_blocking(move || {
        compress_image(&data, DEFAULT_MAX_WIDTH, DEFAULT_JPEG_QUALITY)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Image task failed: {e}")))??;

    let key = object_key(folder, Utc::now().timestamp_millis());
    let stored_size = compressed.bytes.len();
    let url = state
        .store
        .put(&key, compressed.bytes)
        .await
        .map_err(|e| {
            state.reporter.storage("upload image", &e);
            AppError::InternalError(e.to_string())
        })?;

    tracing::info!(
        key = %key,
        original_size,
        stored_size,
        "Image uploaded",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadedImage {
                url,
                key,
                width: compressed.width,
                height: compressed.height,
            },
        }),
    ))
}

/// DELETE /api/v1/admin/uploads
///
/// Delete the object behind a public URL produced by [`upload_image`].
pub async fn delete_image(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<DeleteImageRequest>,
) -> AppResult<Json<DataResponse<DeleteImageResponse>>> {
    let Some(key) = key_from_url(&input.url, state.store.bucket()) else {
        tracing::warn!(url = %input.url, "Delete requested for a URL outside the bucket");
        return Ok(Json(DataResponse {
            data: DeleteImageResponse { deleted: false },
        }));
    };

    let deleted = state.store.delete(key).await.map_err(|e| {
        state.reporter.storage("delete image", &e);
        AppError::InternalError(e.to_string())
    })?;

    tracing::info!(key, deleted, "Image delete processed");

    Ok(Json(DataResponse {
        data: DeleteImageResponse { deleted },
    }))
}
