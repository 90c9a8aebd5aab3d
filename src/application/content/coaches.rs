use std::sync::Arc;

use branford_api_types::{Coach, CoachInput, CoachPatch};
use tracing::info;

use crate::application::repos::CoachesRepo;
use crate::domain::coaches::{validate_coach, validate_coach_patch};

use super::{Collection, ContentError, missing_as_not_found, parse_id, record_mutation};

#[derive(Clone)]
pub struct CoachService {
    repo: Arc<dyn CoachesRepo>,
}

impl CoachService {
    pub fn new(repo: Arc<dyn CoachesRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Coach>, ContentError> {
        Ok(self.repo.list_coaches().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Coach, ContentError> {
        let uuid = parse_id(id)?;
        self.repo
            .find_coach(uuid)
            .await?
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    pub async fn create(&self, input: CoachInput) -> Result<Coach, ContentError> {
        let draft = validate_coach(input)?;
        let coach = self.repo.create_coach(draft).await?;

        record_mutation(Collection::Coaches, "create");
        info!(
            target = "branford::content",
            id = %coach.id,
            name = %coach.name,
            "coach created",
        );
        Ok(coach)
    }

    pub async fn update(&self, id: &str, patch: CoachPatch) -> Result<Coach, ContentError> {
        let changes = validate_coach_patch(patch)?;
        let uuid = parse_id(id)?;
        let coach = self
            .repo
            .update_coach(uuid, changes)
            .await
            .map_err(missing_as_not_found(id))?;

        record_mutation(Collection::Coaches, "update");
        info!(target = "branford::content", id = %coach.id, "coach updated");
        Ok(coach)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ContentError> {
        let uuid = parse_id(id)?;
        self.repo
            .delete_coach(uuid)
            .await
            .map_err(missing_as_not_found(id))?;

        record_mutation(Collection::Coaches, "delete");
        info!(target = "branford::content", id = %uuid, "coach deleted");
        Ok(())
    }
}
