//! Content services: validation in front of the per-collection repositories.

mod coaches;
mod events;
mod gallery;
mod spotlights;

pub use coaches::CoachService;
pub use events::EventService;
pub use gallery::GalleryService;
pub use spotlights::SpotlightService;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Events,
    MemberSpotlights,
    GalleryImages,
    Coaches,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Events => "events",
            Collection::MemberSpotlights => "member_spotlights",
            Collection::GalleryImages => "gallery_images",
            Collection::Coaches => "coaches",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Collection::Events => "event",
            Collection::MemberSpotlights => "member spotlight",
            Collection::GalleryImages => "gallery image",
            Collection::Coaches => "coach",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Collection::Events => "events",
            Collection::MemberSpotlights => "member spotlights",
            Collection::GalleryImages => "gallery images",
            Collection::Coaches => "coaches",
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("record `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Ids that are not UUIDs cannot exist, so they are reported as unknown.
fn parse_id(raw: &str) -> Result<Uuid, ContentError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ContentError::NotFound(raw.to_string()))
}

fn missing_as_not_found(id: &str) -> impl FnOnce(RepoError) -> ContentError + '_ {
    move |err| match err {
        RepoError::NotFound => ContentError::NotFound(id.to_string()),
        other => ContentError::Repo(other),
    }
}

fn record_mutation(collection: Collection, action: &'static str) {
    metrics::counter!(
        crate::infra::telemetry::CONTENT_MUTATIONS_TOTAL,
        "collection" => collection.as_str(),
        "action" => action
    )
    .increment(1);
}
