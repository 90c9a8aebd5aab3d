//! Events handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use branford_api_types::{DeleteResponse, Event, EventInput, EventPatch};

use crate::application::content::Collection;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

use super::{ContentAction, IdQuery, content_to_api, payload_rejection, require_id};

const COLLECTION: Collection = Collection::Events;

pub async fn list_events(State(state): State<ApiState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state
        .events
        .list()
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::List, err))?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .events
        .get(&id)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Get, err))?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<ApiState>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Json(input) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let event = state
        .events
        .create(input)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Create, err))?;
    Ok(Json(event))
}

/// `PATCH /api/events` with the id carried in the body.
pub async fn update_event(
    State(state): State<ApiState>,
    payload: Result<Json<EventPatch>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Json(mut patch) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let id = require_id(patch.id.take())?;
    apply_update(&state, &id, patch).await
}

/// `PATCH /api/events/{id}`; an id in the body is ignored.
pub async fn update_event_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<EventPatch>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Json(patch) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let id = require_id(Some(id))?;
    apply_update(&state, &id, patch).await
}

async fn apply_update(
    state: &ApiState,
    id: &str,
    patch: EventPatch,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .events
        .update(id, patch)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Update, err))?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<ApiState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = require_id(query.id)?;
    remove(&state, &id).await
}

pub async fn delete_event_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = require_id(Some(id))?;
    remove(&state, &id).await
}

async fn remove(state: &ApiState, id: &str) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .events
        .delete(id)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Delete, err))?;
    Ok(Json(DeleteResponse { success: true }))
}
