//! Public read-only routes: stored upload bytes.

use std::io::ErrorKind;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use tracing::error;

use crate::application::error::HttpError;
use crate::infra::uploads::UploadStorageError;

use super::api::ApiState;

const UPLOAD_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Serve stored uploads under `{public_prefix}/{*path}`.
pub fn build_public_router(state: ApiState) -> Router {
    let route = format!("{}/{{*path}}", state.upload_storage.public_prefix());
    Router::new()
        .route(&route, get(serve_upload))
        .with_state(state)
}

async fn serve_upload(State(state): State<ApiState>, Path(path): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::serve_upload";

    let not_found = || {
        HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Upload not found",
            "The requested upload is not available",
        )
        .into_response()
    };

    if path.ends_with(".part") {
        return not_found();
    }

    match state.upload_storage.read(&path).await {
        Ok(bytes) => build_upload_response(&path, bytes),
        Err(UploadStorageError::InvalidPath) => not_found(),
        Err(UploadStorageError::Io(err))
            if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) =>
        {
            not_found()
        }
        Err(err) => {
            error!(
                target = SOURCE,
                path = %path,
                error = %err,
                "failed to read stored upload"
            );
            HttpError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read uploaded file",
                &err,
            )
            .into_response()
        }
    }
}

fn build_upload_response(path: &str, bytes: Bytes) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let mut response = Response::new(Body::from(bytes));
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(UPLOAD_CACHE_CONTROL));
    response
}
