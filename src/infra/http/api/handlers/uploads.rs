//! Uploads handlers

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use branford_api_types::UploadResponse;
use futures::StreamExt;
use serde_json::json;
use tracing::info;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;
use crate::infra::telemetry::{UPLOAD_BYTES, UPLOADS_REJECTED_TOTAL, UPLOADS_TOTAL};
use crate::infra::uploads::UploadStorageError;

use super::upload_storage_to_api;

const FILE_FIELD: &str = "file";
const FALLBACK_FILE_NAME: &str = "upload";

/// Accept a single multipart `file` field and store it.
pub async fn upload_file(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let limit = state.upload_storage.max_bytes();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| reject(&state, multipart_error(limit, err)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
        let content_type = field.content_type().map(str::to_string);
        let stream = field.map(move |chunk| chunk.map_err(|err| multipart_error(limit, err)));

        let stored = state
            .upload_storage
            .store_stream(&file_name, content_type.as_deref(), stream)
            .await
            .map_err(|err| reject(&state, err))?;

        metrics::counter!(UPLOADS_TOTAL).increment(1);
        metrics::histogram!(UPLOAD_BYTES).record(stored.size_bytes as f64);
        info!(
            target = "branford::uploads",
            url = %stored.url,
            size_bytes = stored.size_bytes,
            original_name = %file_name,
            "upload stored",
        );

        return Ok(Json(UploadResponse {
            url: stored.url,
            size_bytes: stored.size_bytes,
        }));
    }

    metrics::counter!(UPLOADS_REJECTED_TOTAL, "reason" => "missing_file").increment(1);
    Err(ApiError::bad_request(
        "No file uploaded",
        Some(json!({ "field": FILE_FIELD, "reason": "file is required" })),
    ))
}

fn multipart_error(limit: u64, err: MultipartError) -> UploadStorageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadStorageError::PayloadTooLarge { limit }
    } else {
        UploadStorageError::PayloadStream {
            source: Box::new(err),
        }
    }
}

fn reject(state: &ApiState, err: UploadStorageError) -> ApiError {
    let reason = match &err {
        UploadStorageError::PayloadTooLarge { .. } => "too_large",
        UploadStorageError::UnsupportedType { .. } => "unsupported_type",
        UploadStorageError::EmptyPayload => "empty",
        UploadStorageError::PayloadStream { .. } => "stream",
        UploadStorageError::InvalidPath => "invalid_path",
        UploadStorageError::Io(_) => "io",
    };
    metrics::counter!(UPLOADS_REJECTED_TOTAL, "reason" => reason).increment(1);
    upload_storage_to_api(state.environment, err)
}
