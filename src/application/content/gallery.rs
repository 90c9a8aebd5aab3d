use std::sync::Arc;

use branford_api_types::{GalleryImage, GalleryImageInput, GalleryImagePatch};
use tracing::info;

use crate::application::repos::GalleryRepo;
use crate::domain::gallery::{validate_gallery_image, validate_gallery_patch};

use super::{Collection, ContentError, missing_as_not_found, parse_id, record_mutation};

#[derive(Clone)]
pub struct GalleryService {
    repo: Arc<dyn GalleryRepo>,
}

impl GalleryService {
    pub fn new(repo: Arc<dyn GalleryRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<GalleryImage>, ContentError> {
        Ok(self.repo.list_gallery_images().await?)
    }

    pub async fn get(&self, id: &str) -> Result<GalleryImage, ContentError> {
        let uuid = parse_id(id)?;
        self.repo
            .find_gallery_image(uuid)
            .await?
            .ok_or_else(|| ContentError::NotFound(id.to_string()))
    }

    pub async fn create(&self, input: GalleryImageInput) -> Result<GalleryImage, ContentError> {
        let draft = validate_gallery_image(input)?;
        let image = self.repo.create_gallery_image(draft).await?;

        record_mutation(Collection::GalleryImages, "create");
        info!(target = "branford::content", id = %image.id, "gallery image created");
        Ok(image)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: GalleryImagePatch,
    ) -> Result<GalleryImage, ContentError> {
        let changes = validate_gallery_patch(patch)?;
        let uuid = parse_id(id)?;
        let image = self
            .repo
            .update_gallery_image(uuid, changes)
            .await
            .map_err(missing_as_not_found(id))?;

        record_mutation(Collection::GalleryImages, "update");
        info!(target = "branford::content", id = %image.id, "gallery image updated");
        Ok(image)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ContentError> {
        let uuid = parse_id(id)?;
        self.repo
            .delete_gallery_image(uuid)
            .await
            .map_err(missing_as_not_found(id))?;

        record_mutation(Collection::GalleryImages, "delete");
        info!(target = "branford::content", id = %uuid, "gallery image deleted");
        Ok(())
    }
}
