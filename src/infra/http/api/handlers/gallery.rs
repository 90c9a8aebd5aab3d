//! Gallery handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use branford_api_types::{DeleteResponse, GalleryImage, GalleryImageInput, GalleryImagePatch};

use crate::application::content::Collection;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

use super::{ContentAction, IdQuery, content_to_api, payload_rejection, require_id};

const COLLECTION: Collection = Collection::GalleryImages;

pub async fn list_gallery_images(
    State(state): State<ApiState>,
) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    let images = state
        .gallery
        .list()
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::List, err))?;
    Ok(Json(images))
}

pub async fn get_gallery_image(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<GalleryImage>, ApiError> {
    let image = state
        .gallery
        .get(&id)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Get, err))?;
    Ok(Json(image))
}

pub async fn create_gallery_image(
    State(state): State<ApiState>,
    payload: Result<Json<GalleryImageInput>, JsonRejection>,
) -> Result<Json<GalleryImage>, ApiError> {
    let Json(input) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let image = state
        .gallery
        .create(input)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Create, err))?;
    Ok(Json(image))
}

/// `PATCH /api/gallery` with the id carried in the body.
pub async fn update_gallery_image(
    State(state): State<ApiState>,
    payload: Result<Json<GalleryImagePatch>, JsonRejection>,
) -> Result<Json<GalleryImage>, ApiError> {
    let Json(mut patch) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let id = require_id(patch.id.take())?;
    apply_update(&state, &id, patch).await
}

/// `PATCH /api/gallery/{id}`; an id in the body is ignored.
pub async fn update_gallery_image_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<GalleryImagePatch>, JsonRejection>,
) -> Result<Json<GalleryImage>, ApiError> {
    let Json(patch) = payload.map_err(|rejection| payload_rejection(COLLECTION, rejection))?;
    let id = require_id(Some(id))?;
    apply_update(&state, &id, patch).await
}

async fn apply_update(
    state: &ApiState,
    id: &str,
    patch: GalleryImagePatch,
) -> Result<Json<GalleryImage>, ApiError> {
    let image = state
        .gallery
        .update(id, patch)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Update, err))?;
    Ok(Json(image))
}

pub async fn delete_gallery_image(
    State(state): State<ApiState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = require_id(query.id)?;
    remove(&state, &id).await
}

pub async fn delete_gallery_image_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = require_id(Some(id))?;
    remove(&state, &id).await
}

async fn remove(state: &ApiState, id: &str) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .gallery
        .delete(id)
        .await
        .map_err(|err| content_to_api(state.environment, COLLECTION, ContentAction::Delete, err))?;
    Ok(Json(DeleteResponse { success: true }))
}
