use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::infra::http::middleware::has_admin_session;

use super::error::ApiError;
use super::state::ApiState;

/// Reads are public; every other method needs a signed-in admin.
pub async fn require_admin_for_writes(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let read_only = matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    );
    if read_only || has_admin_session(request.headers(), &state.sessions) {
        return next.run(request).await;
    }

    ApiError::unauthorized().into_response()
}
