//! Content API handlers organized by collection.
//!
//! Error conversion shared by the collections lives here so every surface speaks
//! the same `{ error, details? }` dialect.

mod coaches;
mod events;
mod gallery;
mod health;
mod spotlights;
mod uploads;

pub use coaches::*;
pub use events::*;
pub use gallery::*;
pub use health::*;
pub use spotlights::*;
pub use uploads::*;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::application::content::{Collection, ContentError};
use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;
use crate::config::RuntimeEnvironment;
use crate::infra::uploads::UploadStorageError;

use super::error::ApiError;

const CONTENT_SOURCE: &str = "infra::http::api::content";
const UPLOAD_SOURCE: &str = "infra::http::api::uploads";

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum ContentAction {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl ContentAction {
    fn failure_message(self, collection: Collection) -> String {
        match self {
            ContentAction::List => format!("Failed to fetch {}", collection.plural()),
            ContentAction::Get => format!("Failed to fetch {}", collection.singular()),
            ContentAction::Create => format!("Failed to create {}", collection.singular()),
            ContentAction::Update => format!("Failed to update {}", collection.singular()),
            ContentAction::Delete => format!("Failed to delete {}", collection.singular()),
        }
    }
}

fn not_found_message(collection: Collection) -> String {
    let singular = collection.singular();
    let mut chars = singular.chars();
    match chars.next() {
        Some(first) => format!("{}{} not found", first.to_ascii_uppercase(), chars.as_str()),
        None => "Not found".to_string(),
    }
}

pub(crate) fn content_to_api(
    environment: RuntimeEnvironment,
    collection: Collection,
    action: ContentAction,
    err: ContentError,
) -> ApiError {
    match err {
        ContentError::Validation(inner) => ApiError::bad_request(
            format!("Invalid {} data", collection.singular()),
            Some(json!({ "field": inner.field(), "reason": inner.to_string() })),
        )
        .with_report(ErrorReport::from_error(
            CONTENT_SOURCE,
            StatusCode::BAD_REQUEST,
            &inner,
        )),
        ContentError::NotFound(id) => ApiError::not_found(not_found_message(collection))
            .with_report(ErrorReport::from_message(
                CONTENT_SOURCE,
                StatusCode::NOT_FOUND,
                format!("{} `{id}` not found", collection.singular()),
            )),
        ContentError::Repo(RepoError::NotFound) => ApiError::not_found(not_found_message(
            collection,
        ))
        .with_report(ErrorReport::from_message(
            CONTENT_SOURCE,
            StatusCode::NOT_FOUND,
            format!("{} not found", collection.singular()),
        )),
        ContentError::Repo(repo) => {
            let details = environment
                .is_development()
                .then(|| json!({ "message": repo.to_string() }));
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                action.failure_message(collection),
                details,
            )
            .with_report(ErrorReport::from_error(
                CONTENT_SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                &repo,
            ))
        }
    }
}

/// Malformed JSON bodies are reported like any other invalid payload.
pub(crate) fn payload_rejection(collection: Collection, rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(
        format!("Invalid {} data", collection.singular()),
        Some(json!({ "reason": rejection.body_text() })),
    )
    .with_report(ErrorReport::from_error(
        CONTENT_SOURCE,
        StatusCode::BAD_REQUEST,
        &rejection,
    ))
}

pub(crate) fn require_id(raw: Option<String>) -> Result<String, ApiError> {
    match raw.map(|value| value.trim().to_string()) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ApiError::bad_request(
            "ID is required",
            Some(json!({ "field": "id", "reason": "id is required" })),
        )),
    }
}

pub(crate) fn upload_storage_to_api(
    environment: RuntimeEnvironment,
    err: UploadStorageError,
) -> ApiError {
    let api = match &err {
        UploadStorageError::PayloadTooLarge { limit } => ApiError::bad_request(
            "File exceeds the upload limit",
            Some(json!({ "limitBytes": limit })),
        ),
        UploadStorageError::UnsupportedType { .. } => ApiError::bad_request(
            "Only image uploads are accepted",
            Some(json!({ "field": "file", "reason": err.to_string() })),
        ),
        UploadStorageError::EmptyPayload => ApiError::bad_request(
            "Uploaded file is empty",
            Some(json!({ "field": "file", "reason": err.to_string() })),
        ),
        UploadStorageError::PayloadStream { .. } => {
            ApiError::bad_request("Failed to read uploaded file", None)
        }
        UploadStorageError::InvalidPath => ApiError::bad_request("Invalid upload path", None),
        UploadStorageError::Io(io) => ApiError::internal("Failed to save file").with_details(
            environment
                .is_development()
                .then(|| json!({ "message": io.to_string() })),
        ),
    };
    let status = api.status();
    api.with_report(ErrorReport::from_error(UPLOAD_SOURCE, status, &err))
}
