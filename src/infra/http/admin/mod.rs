//! Admin surface: session login/logout and the gated dashboard.
//!
//! Every route here is behind [`require_admin_page`] except the login form itself;
//! unauthenticated visitors are redirected to `/admin/login`.

mod dashboard;
mod session;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::api::ApiState;
use super::middleware::{LOGIN_PATH, require_admin_page};

pub fn build_admin_router(state: ApiState) -> Router {
    let gate_state = state.clone();

    Router::new()
        .route("/admin", get(dashboard::admin_summary))
        .route(
            LOGIN_PATH,
            get(session::login_form).post(session::login),
        )
        .route("/admin/logout", post(session::logout))
        .route("/admin/{*rest}", get(dashboard::admin_not_found))
        .with_state(state)
        .layer(middleware::from_fn_with_state(gate_state, require_admin_page))
}
