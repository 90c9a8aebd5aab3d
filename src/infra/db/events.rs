use async_trait::async_trait;
use branford_api_types::Event;
use uuid::Uuid;

use crate::{
    application::repos::{EventsRepo, RepoError},
    domain::{
        dates::storage_timestamp,
        events::{EventChanges, EventDraft},
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const EVENT_COLUMNS: &str = "id, title, date, time, location, cost, who, description, \
    image, registration_link, promo_code, created_at, updated_at";

#[async_trait]
impl EventsRepo for PostgresRepositories {
    async fn list_events(&self) -> Result<Vec<Event>, RepoError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, created_at ASC");
        sqlx::query_as::<_, Event>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, RepoError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_event(&self, draft: EventDraft) -> Result<Event, RepoError> {
        let sql = format!(
            "INSERT INTO events (id, title, date, time, location, cost, who, description, \
                image, registration_link, promo_code) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.title)
            .bind(storage_timestamp(draft.date))
            .bind(draft.time)
            .bind(draft.location)
            .bind(draft.cost)
            .bind(draft.who)
            .bind(draft.description)
            .bind(draft.image)
            .bind(draft.registration_link)
            .bind(draft.promo_code)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Event, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let select = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE");
        let mut event = sqlx::query_as::<_, Event>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        changes.apply(&mut event);

        let update = format!(
            "UPDATE events SET title = $2, date = $3, time = $4, location = $5, cost = $6, \
                who = $7, description = $8, image = $9, registration_link = $10, \
                promo_code = $11, updated_at = now() \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Event>(&update)
            .bind(id)
            .bind(event.title)
            .bind(event.date)
            .bind(event.time)
            .bind(event.location)
            .bind(event.cost)
            .bind(event.who)
            .bind(event.description)
            .bind(event.image)
            .bind(event.registration_link)
            .bind(event.promo_code)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(updated)
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
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
