use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use branford_api_types::ErrorBody;
use serde_json::Value;

use crate::application::error::ErrorReport;

/// JSON error response: `{ "error": message, "details"?: value }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<Value>,
    report: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            status,
            message: message.into(),
            details,
            report: None,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Option<Value>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, details)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, None)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", None)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    /// Replace the default diagnostic with the full error chain of the failure.
    pub fn with_report(mut self, report: ErrorReport) -> Self {
        self.report = Some(report);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = self.report.unwrap_or_else(|| {
            ErrorReport::from_message("infra::http::api", self.status, self.message.clone())
        });
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        let mut response = (self.status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}
