use std::sync::Arc;

use branford_api_types::{Event, EventInput, EventPatch};
use tracing::info;

use crate::application::repos::EventsRepo;
use crate::domain::events::{validate_event, validate_event_patch};

use super::{Collection, ContentError, missing_as_not_found, parse_id, record_mutation};

#[derive(Clone)]
pub struct EventService {
    repo: Arc<dyn EventsRepo>,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Event>, ContentError> {
        Ok(self.repo.list_events().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Event, ContentError> {
        let uuid = parse_id(id)?;
        self.repo
            .find_event(uuid)
            .await?
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    pub async fn create(&self, input: EventInput) -> Result<Event, ContentError> {
        let draft = validate_event(input)?;
        let event = self.repo.create_event(draft).await?;

        record_mutation(Collection::Events, "create");
        info!(target = "branford::content", id = %event.id, title = %event.title, "event created");
        Ok(event)
    }

    pub async fn update(&self, id: &str, patch: EventPatch) -> Result<Event, ContentError> {
        let changes = validate_event_patch(patch)?;
        let uuid = parse_id(id)?;
        let event = self
            .repo
            .update_event(uuid, changes)
            .await
            .map_err(missing_as_not_found(id))?;

        record_mutation(Collection::Events, "update");
        info!(target = "branford::content", id = %event.id, "event updated");
        Ok(event)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ContentError> {
        let uuid = parse_id(id)?;
        self.repo
            .delete_event(uuid)
            .await
            .map_err(missing_as_not_found(id))?;

        record_mutation(Collection::Events, "delete");
        info!(target = "branford::content", id = %uuid, "event deleted");
        Ok(())
    }
}
