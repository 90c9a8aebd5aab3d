pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

pub fn build_api_router(state: ApiState, body_limit: usize) -> Router {
    let auth_state = state.clone();

    Router::new()
        .route(
            "/api/events",
            get(handlers::list_events)
                .post(handlers::create_event)
                .patch(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .route(
            "/api/events/{id}",
            get(handlers::get_event)
                .patch(handlers::update_event_by_id)
                .delete(handlers::delete_event_by_id),
        )
        .route(
            "/api/member-spotlights",
            get(handlers::list_spotlights)
                .post(handlers::create_spotlight)
                .patch(handlers::update_spotlight)
                .delete(handlers::delete_spotlight),
        )
        .route(
            "/api/member-spotlights/{id}",
            get(handlers::get_spotlight)
                .patch(handlers::update_spotlight_by_id)
                .delete(handlers::delete_spotlight_by_id),
        )
        .route(
            "/api/members",
            get(handlers::list_spotlights).post(handlers::create_spotlight),
        )
        .route(
            "/api/gallery",
            get(handlers::list_gallery_images)
                .post(handlers::create_gallery_image)
                .patch(handlers::update_gallery_image)
                .delete(handlers::delete_gallery_image),
        )
        .route(
            "/api/gallery/{id}",
            get(handlers::get_gallery_image)
                .patch(handlers::update_gallery_image_by_id)
                .delete(handlers::delete_gallery_image_by_id),
        )
        .route(
            "/api/coaches",
            get(handlers::list_coaches)
                .post(handlers::create_coach)
                .patch(handlers::update_coach)
                .delete(handlers::delete_coach),
        )
        .route(
            "/api/coaches/{id}",
            get(handlers::get_coach)
                .patch(handlers::update_coach_by_id)
                .delete(handlers::delete_coach_by_id),
        )
        .route("/api/upload", post(handlers::upload_file))
        .route("/api/health", get(handlers::health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::require_admin_for_writes,
        ))
}
