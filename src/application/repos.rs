//! Repository traits describing persistence adapters.
//!
//! Every collection exposes the same gateway: list in display order, create with
//! server-assigned identity and timestamps, partial update, and delete. Update and
//! delete of an unknown id fail with [`RepoError::NotFound`]; deleting twice is an error.

use async_trait::async_trait;
use branford_api_types::{Coach, Event, GalleryImage, MemberSpotlight};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::coaches::{CoachChanges, CoachDraft};
use crate::domain::events::{EventChanges, EventDraft};
use crate::domain::gallery::{GalleryChanges, GalleryDraft};
use crate::domain::spotlights::{SpotlightChanges, SpotlightDraft};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Events, ascending by date.
#[async_trait]
pub trait EventsRepo: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, RepoError>;

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, RepoError>;

    async fn create_event(&self, draft: EventDraft) -> Result<Event, RepoError>;

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Event, RepoError>;

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Member spotlights, newest first.
#[async_trait]
pub trait SpotlightsRepo: Send + Sync {
    async fn list_spotlights(&self) -> Result<Vec<MemberSpotlight>, RepoError>;

    async fn find_spotlight(&self, id: Uuid) -> Result<Option<MemberSpotlight>, RepoError>;

    async fn create_spotlight(&self, draft: SpotlightDraft) -> Result<MemberSpotlight, RepoError>;

    async fn update_spotlight(
        &self,
        id: Uuid,
        changes: SpotlightChanges,
    ) -> Result<MemberSpotlight, RepoError>;

    async fn delete_spotlight(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Gallery images, newest first.
#[async_trait]
pub trait GalleryRepo: Send + Sync {
    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, RepoError>;

    async fn find_gallery_image(&self, id: Uuid) -> Result<Option<GalleryImage>, RepoError>;

    async fn create_gallery_image(&self, draft: GalleryDraft) -> Result<GalleryImage, RepoError>;

    async fn update_gallery_image(
        &self,
        id: Uuid,
        changes: GalleryChanges,
    ) -> Result<GalleryImage, RepoError>;

    async fn delete_gallery_image(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Coaches, in the order they were added.
#[async_trait]
pub trait CoachesRepo: Send + Sync {
    async fn list_coaches(&self) -> Result<Vec<Coach>, RepoError>;

    async fn find_coach(&self, id: Uuid) -> Result<Option<Coach>, RepoError>;

    async fn create_coach(&self, draft: CoachDraft) -> Result<Coach, RepoError>;

    async fn update_coach(&self, id: Uuid, changes: CoachChanges) -> Result<Coach, RepoError>;

    async fn delete_coach(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Connectivity probe used by the health endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
