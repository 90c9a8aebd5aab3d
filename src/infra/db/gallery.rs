use async_trait::async_trait;
use branford_api_types::GalleryImage;
use uuid::Uuid;

use crate::{
    application::repos::{GalleryRepo, RepoError},
    domain::gallery::{GalleryChanges, GalleryDraft},
};

use super::{PostgresRepositories, map_sqlx_error};

const GALLERY_COLUMNS: &str = "id, url, caption, created_at, updated_at";

#[async_trait]
impl GalleryRepo for PostgresRepositories {
    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, RepoError> {
        let sql =
            format!("SELECT {GALLERY_COLUMNS} FROM gallery_images ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, GalleryImage>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_gallery_image(&self, id: Uuid) -> Result<Option<GalleryImage>, RepoError> {
        let sql = format!("SELECT {GALLERY_COLUMNS} FROM gallery_images WHERE id = $1");
        sqlx::query_as::<_, GalleryImage>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_gallery_image(&self, draft: GalleryDraft) -> Result<GalleryImage, RepoError> {
        let sql = format!(
            "INSERT INTO gallery_images (id, url, caption) VALUES ($1, $2, $3) \
             RETURNING {GALLERY_COLUMNS}"
        );
        sqlx::query_as::<_, GalleryImage>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.url)
            .bind(draft.caption)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_gallery_image(
        &self,
        id: Uuid,
        changes: GalleryChanges,
    ) -> Result<GalleryImage, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let select = format!("SELECT {GALLERY_COLUMNS} FROM gallery_images WHERE id = $1 FOR UPDATE");
        let mut image = sqlx::query_as::<_, GalleryImage>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        changes.apply(&mut image);

        let update = format!(
            "UPDATE gallery_images SET url = $2, caption = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING {GALLERY_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, GalleryImage>(&update)
            .bind(id)
            .bind(image.url)
            .bind(image.caption)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(updated)
    }

    async fn delete_gallery_image(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM gallery_images WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
