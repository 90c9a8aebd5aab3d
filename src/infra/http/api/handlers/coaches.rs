//! Coach profile handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use branford_api_types::{Coach, CoachInput, CoachPatch, DeleteResponse};

use crate::application::content::Collection;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

use super::{ContentAction, IdQuery, content_to_api, payload_rejection, require_id};

const COLLECTION: Collection = Collection::Coaches;

pub async fn list_coaches(State(state): State<ApiState>) -> Result<Json<Vec<Coach>>, ApiError> {
    let coaches = state
        .coaches
        .list()
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::List, err))?;
    Ok(Json(coaches))
}

pub async fn get_coach(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Coach>, ApiError> {
    let coach = state
        .coaches
        .get(&id)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Get, err))?;
    Ok(Json(coach))
}

pub async fn create_coach(
    State(state): State<ApiState>,
    payload: Result<Json<CoachInput>, JsonRejection>,
) -> Result<Json<Coach>, ApiError> {
    let Json(input) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let coach = state
        .coaches
        .create(input)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Create, err))?;
    Ok(Json(coach))
}

pub async fn update_coach(
    State(state): State<ApiState>,
    payload: Result<Json<CoachPatch>, JsonRejection>,
) -> Result<Json<Coach>, ApiError> {
    let Json(mut patch) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let id = require_id(patch.id.take())?;
    apply_update(&state, &id, patch).await
}

pub async fn update_coach_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<CoachPatch>, JsonRejection>,
) -> Result<Json<Coach>, ApiError> {
    let Json(patch) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let id = require_id(Some(id))?;
    apply_update(&state, &id, patch).await
}

async fn apply_update(
    state: &ApiState,
    id: &str,
    patch: CoachPatch,
) -> Result<Json<Coach>, ApiError> {
    let coach = state
        .coaches
        .update(id, patch)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Update, err))?;
    Ok(Json(coach))
}

pub async fn delete_coach(
    State(state): State<ApiState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = require_id(query.id)?;
    remove(&state, &id).await
}

pub async fn delete_coach_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = require_id(Some(id))?;
    remove(&state, &id).await
}

async fn remove(state: &ApiState, id: &str) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .coaches
        .delete(id)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Delete, err))?;
    Ok(Json(DeleteResponse { success: true }))
}
