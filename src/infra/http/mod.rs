mod admin;
pub mod api;
pub mod middleware;
mod public;

pub use admin::build_admin_router;
pub use api::{ApiState, build_api_router};
pub use public::build_public_router;

use axum::{Router, middleware as axum_middleware};

use self::middleware::{log_responses, set_request_context};

/// Extra room on top of the per-file ceiling for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Assemble the full application: content API, admin surface and stored uploads.
pub fn build_router(state: ApiState) -> Router {
    let max_file_bytes = usize::try_from(state.upload_storage.max_bytes()).unwrap_or(usize::MAX);
    let body_limit = max_file_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    build_api_router(state.clone(), body_limit)
        .merge(build_admin_router(state.clone()))
        .merge(build_public_router(state))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
