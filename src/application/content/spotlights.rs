use std::sync::Arc;

use branford_api_types::{MemberSpotlight, MemberSpotlightInput, MemberSpotlightPatch};
use tracing::info;

use crate::application::repos::SpotlightsRepo;
use crate::domain::spotlights::{validate_spotlight, validate_spotlight_patch};

use super::{Collection, ContentError, missing_as_not_found, parse_id, record_mutation};

#[derive(Clone)]
pub struct SpotlightService {
    repo: Arc<dyn SpotlightsRepo>,
}

impl SpotlightService {
    pub fn new(repo: Arc<dyn SpotlightsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<MemberSpotlight>, ContentError> {
        Ok(self.repo.list_spotlights().await?)
    }

    pub async fn get(&self, id: &str) -> Result<MemberSpotlight, ContentError> {
        let uuid = parse_id(id)?;
        self.repo
            .find_spotlight(uuid)
            .await?
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    pub async fn create(
        &self,
        input: MemberSpotlightInput,
    ) -> Result<MemberSpotlight, ContentError> {
        let draft = validate_spotlight(input)?;
        let spotlight = self.repo.create_spotlight(draft).await?;

        record_mutation(Collection::MemberSpotlights, "create");
        info!(
            target = "branford::content",
            id = %spotlight.id,
            name = %spotlight.name,
            "member spotlight created",
        );
        Ok(spotlight)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: MemberSpotlightPatch,
    ) -> Result<MemberSpotlight, ContentError> {
        let changes = validate_spotlight_patch(patch)?;
        let uuid = parse_id(id)?;
        let spotlight = self
            .repo
            .update_spotlight(uuid, changes)
            .await
            .map_err(missing_as_not_found(id))?;

        record_mutation(Collection::MemberSpotlights, "update");
        info!(target = "branford::content", id = %spotlight.id, "member spotlight updated");
        Ok(spotlight)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ContentError> {
        let uuid = parse_id(id)?;
        self.repo
            .delete_spotlight(uuid)
            .await
            .map_err(missing_as_not_found(id))?;

        record_mutation(Collection::MemberSpotlights, "delete");
        info!(target = "branford::content", id = %uuid, "member spotlight deleted");
        Ok(())
    }
}
