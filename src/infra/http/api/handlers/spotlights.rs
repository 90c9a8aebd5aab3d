//! Member spotlight handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use branford_api_types::{
    DeleteResponse, MemberSpotlight, MemberSpotlightInput, MemberSpotlightPatch,
};

use crate::application::content::Collection;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

use super::{ContentAction, IdQuery, content_to_api, payload_rejection, require_id};

const COLLECTION: Collection = Collection::MemberSpotlights;

pub async fn list_spotlights(
    State(state): State<ApiState>,
) -> Result<Json<Vec<MemberSpotlight>>, ApiError> {
    let spotlights = state
        .spotlights
        .list()
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::List, err))?;
    Ok(Json(spotlights))
}

pub async fn get_spotlight(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<MemberSpotlight>, ApiError> {
    let spotlight = state
        .spotlights
        .get(&id)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Get, err))?;
    Ok(Json(spotlight))
}

pub async fn create_spotlight(
    State(state): State<ApiState>,
    payload: Result<Json<MemberSpotlightInput>, JsonRejection>,
) -> Result<Json<MemberSpotlight>, ApiError> {
    let Json(input) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let spotlight = state
        .spotlights
        .create(input)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Create, err))?;
    Ok(Json(spotlight))
}

/// `PATCH /api/member-spotlights` with the id carried in the body.
pub async fn update_spotlight(
    State(state): State<ApiState>,
    payload: Result<Json<MemberSpotlightPatch>, JsonRejection>,
) -> Result<Json<MemberSpotlight>, ApiError> {
    let Json(mut patch) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let id = require_id(patch.id.take())?;
    apply_update(&state, &id, patch).await
}

/// `PATCH /api/member-spotlights/{id}`; an id in the body is ignored.
pub async fn update_spotlight_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<MemberSpotlightPatch>, JsonRejection>,
) -> Result<Json<MemberSpotlight>, ApiError> {
    let Json(patch) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let id = require_id(Some(id))?;
    apply_update(&state, &id, patch).await
}

async fn apply_update(
    state: &ApiState,
    id: &str,
    patch: MemberSpotlightPatch,
) -> Result<Json<MemberSpotlight>, ApiError> {
    let spotlight = state
        .spotlights
        .update(id, patch)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Update, err))?;
    Ok(Json(spotlight))
}

pub async fn delete_spotlight(
    State(state): State<ApiState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = require_id(query.id)?;
    remove(&state, &id).await
}

pub async fn delete_spotlight_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = require_id(Some(id))?;
    remove(&state, &id).await
}

async fn remove(state: &ApiState, id: &str) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .spotlights
        .delete(id)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Delete, err))?;
    Ok(Json(DeleteResponse { success: true }))
}
