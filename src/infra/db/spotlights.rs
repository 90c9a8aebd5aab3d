use async_trait::async_trait;
use branford_api_types::MemberSpotlight;
use uuid::Uuid;

use crate::{
    application::repos::{RepoError, SpotlightsRepo},
    domain::spotlights::{SpotlightChanges, SpotlightDraft},
};

use super::{PostgresRepositories, map_sqlx_error};

const SPOTLIGHT_COLUMNS: &str =
    "id, name, member_since, quote, recent_achievement, image, created_at, updated_at";

#[async_trait]
impl SpotlightsRepo for PostgresRepositories {
    async fn list_spotlights(&self) -> Result<Vec<MemberSpotlight>, RepoError> {
        let sql = format!(
            "SELECT {SPOTLIGHT_COLUMNS} FROM member_spotlights ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, MemberSpotlight>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_spotlight(&self, id: Uuid) -> Result<Option<MemberSpotlight>, RepoError> {
        let sql = format!("SELECT {SPOTLIGHT_COLUMNS} FROM member_spotlights WHERE id = $1");
        sqlx::query_as::<_, MemberSpotlight>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_spotlight(&self, draft: SpotlightDraft) -> Result<MemberSpotlight, RepoError> {
        let sql = format!(
            "INSERT INTO member_spotlights (id, name, member_since, quote, recent_achievement, image) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SPOTLIGHT_COLUMNS}"
        );
        sqlx::query_as::<_, MemberSpotlight>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.name)
            .bind(draft.member_since)
            .bind(draft.quote)
            .bind(draft.recent_achievement)
            .bind(draft.image)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_spotlight(
        &self,
        id: Uuid,
        changes: SpotlightChanges,
    ) -> Result<MemberSpotlight, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let select =
            format!("SELECT {SPOTLIGHT_COLUMNS} FROM member_spotlights WHERE id = $1 FOR UPDATE");
        let mut spotlight = sqlx::query_as::<_, MemberSpotlight>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        changes.apply(&mut spotlight);

        let update = format!(
            "UPDATE member_spotlights SET name = $2, member_since = $3, quote = $4, \
                recent_achievement = $5, image = $6, updated_at = now() \
             WHERE id = $1 \
             RETURNING {SPOTLIGHT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, MemberSpotlight>(&update)
            .bind(id)
            .bind(spotlight.name)
            .bind(spotlight.member_since)
            .bind(spotlight.quote)
            .bind(spotlight.recent_achievement)
            .bind(spotlight.image)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(updated)
    }

    async fn delete_spotlight(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM member_spotlights WHERE id = $1")
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
