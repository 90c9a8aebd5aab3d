use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use branford_api_types::AdminSummary;

use crate::application::content::Collection;
use crate::application::error::HttpError;
use crate::infra::http::api::ApiState;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::handlers::{ContentAction, content_to_api};

/// Collection sizes for the admin landing page.
pub async fn admin_summary(State(state): State<ApiState>) -> Result<Json<AdminSummary>, ApiError> {
    let environment = state.environment;
    let events = state.events.list().await.map_err(|err| {
        content_to_api(environment, Collection::Events, ContentAction::List, err)
    })?;
    let spotlights = state.spotlights.list().await.map_err(|err| {
        content_to_api(
            environment,
            Collection::MemberSpotlights,
            ContentAction::List,
            err,
        )
    })?;
    let gallery = state.gallery.list().await.map_err(|err| {
        content_to_api(
            environment,
            Collection::GalleryImages,
            ContentAction::List,
            err,
        )
    })?;
    let coaches = state.coaches.list().await.map_err(|err| {
        content_to_api(environment, Collection::Coaches, ContentAction::List, err)
    })?;

    Ok(Json(AdminSummary {
        events: events.len(),
        member_spotlights: spotlights.len(),
        gallery_images: gallery.len(),
        coaches: coaches.len(),
    }))
}

pub async fn admin_not_found() -> HttpError {
    HttpError::new(
        "infra::http::admin",
        StatusCode::NOT_FOUND,
        "Not found",
        "unknown admin page",
    )
}
