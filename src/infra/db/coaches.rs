use async_trait::async_trait;
use branford_api_types::Coach;
use uuid::Uuid;

use crate::{
    application::repos::{CoachesRepo, RepoError},
    domain::coaches::{CoachChanges, CoachDraft},
};

use super::{PostgresRepositories, map_sqlx_error};

const COACH_COLUMNS: &str =
    "id, name, role, bio, certifications, achievements, image, created_at, updated_at";

#[async_trait]
impl CoachesRepo for PostgresRepositories {
    async fn list_coaches(&self) -> Result<Vec<Coach>, RepoError> {
        let sql = format!("SELECT {COACH_COLUMNS} FROM coaches ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, Coach>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_coach(&self, id: Uuid) -> Result<Option<Coach>, RepoError> {
        let sql = format!("SELECT {COACH_COLUMNS} FROM coaches WHERE id = $1");
        sqlx::query_as::<_, Coach>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_coach(&self, draft: CoachDraft) -> Result<Coach, RepoError> {
        let sql = format!(
            "INSERT INTO coaches (id, name, role, bio, certifications, achievements, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COACH_COLUMNS}"
        );
        sqlx::query_as::<_, Coach>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.name)
            .bind(draft.role)
            .bind(draft.bio)
            .bind(draft.certifications)
            .bind(draft.achievements)
            .bind(draft.image)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_coach(&self, id: Uuid, changes: CoachChanges) -> Result<Coach, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let select = format!("SELECT {COACH_COLUMNS} FROM coaches WHERE id = $1 FOR UPDATE");
        let mut coach = sqlx::query_as::<_, Coach>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        changes.apply(&mut coach);

        let update = format!(
            "UPDATE coaches SET name = $2, role = $3, bio = $4, certifications = $5, \
                achievements = $6, image = $7, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COACH_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Coach>(&update)
            .bind(id)
            .bind(coach.name)
            .bind(coach.role)
            .bind(coach.bio)
            .bind(coach.certifications)
            .bind(coach.achievements)
            .bind(coach.image)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(updated)
    }

    async fn delete_coach(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM coaches WHERE id = $1")
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
