//! Per-collection state for admin edit screens.
//!
//! A [`CollectionStore`] loads the whole collection once, then folds the server's
//! answer to each mutation into its local list. Nothing changes locally until the
//! request has succeeded, so a failed mutation leaves the list exactly as it was.

use branford_api_types::{
    Coach, CoachInput, CoachPatch, Event, EventInput, EventPatch, GalleryImage, GalleryImageInput, GalleryImagePatch,
    MemberSpotlight, MemberSpotlightInput, MemberSpotlightPatch,
};
use branford_api_types::dates::{format_calendar_date, parse_calendar_date};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::client::{ApiClient, ClientError};

/// Binds a collection to its endpoint and payload types.
pub trait ContentResource {
    type Record: DeserializeOwned + Serialize + Clone;
    type Input: Serialize;
    type Patch: Serialize;

    /// Collection path relative to the site root.
    const PATH: &'static str;

    /// Where a freshly created record lands in the local list; mirrors the server's ordering.
    const NEWEST_LAST: bool = false;

    fn id(record: &Self::Record) -> Uuid;

    /// Client-side normalization applied before a patch is sent.
    fn prepare_patch(patch: Self::Patch) -> Result<Self::Patch, ClientError> {
        Ok(patch)
    }
}

pub struct Events;
pub struct Spotlights;
pub struct Gallery;
pub struct Coaches;

impl ContentResource for Events {
    type Record = Event;
    type Input = EventInput;
    type Patch = EventPatch;

    const PATH: &'static str = "api/events";

    fn id(record: &Event) -> Uuid {
        record.id
    }

    fn prepare_patch(mut patch: EventPatch) -> Result<EventPatch, ClientError> {
        if let Some(raw) = patch.date.take() {
            patch.date = Some(normalize_date(&raw)?);
        }
        Ok(patch)
    }
}

impl ContentResource for Spotlights {
    type Record = MemberSpotlight;
    type Input = MemberSpotlightInput;
    type Patch = MemberSpotlightPatch;

    const PATH: &'static str = "api/member-spotlights";

    fn id(record: &MemberSpotlight) -> Uuid {
        record.id
    }
}

impl ContentResource for Coaches {
    type Record = Coach;
    type Input = CoachInput;
    type Patch = CoachPatch;

    const PATH: &'static str = "api/coaches";
    const NEWEST_LAST: bool = true;

    fn id(record: &Coach) -> Uuid {
        record.id
    }
}

impl ContentResource for Gallery {
    type Record = GalleryImage;
    type Input = GalleryImageInput;
    type Patch = GalleryImagePatch;

    const PATH: &'static str = "api/gallery";

    fn id(record: &GalleryImage) -> Uuid {
        record.id
    }
}

/// Reduce any accepted date input to `YYYY-MM-DD`, the same way the server does.
pub fn normalize_date(raw: &str) -> Result<String, ClientError> {
    parse_calendar_date(raw)
        .map(format_calendar_date)
        .ok_or_else(|| ClientError::InvalidInput("Invalid date format".into()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

pub struct CollectionStore<R: ContentResource> {
    client: ApiClient,
    items: Vec<R::Record>,
    state: LoadState,
    error: Option<String>,
}

impl<R: ContentResource> CollectionStore<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            items: Vec::new(),
            state: LoadState::Loading,
            error: None,
        }
    }

    /// Create the store and fetch the collection.
    pub async fn mount(client: ApiClient) -> Self {
        let mut store = Self::new(client);
        store.refresh().await;
        store
    }

    pub async fn refresh(&mut self) {
        self.state = LoadState::Loading;
        match self.client.get_json::<Vec<R::Record>>(R::PATH).await {
            Ok(items) => {
                self.items = items;
                self.state = LoadState::Ready;
                self.error = None;
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(message.clone());
                self.state = LoadState::Failed(message);
            }
        }
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Message of the most recent failed load or mutation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn create(&mut self, input: &R::Input) -> Result<R::Record, ClientError> {
        let result = self
            .client
            .send_json::<_, R::Record>(Method::POST, R::PATH, input)
            .await;
        let created = self.track(result)?;
        if R::NEWEST_LAST {
            self.items.push(created.clone());
        } else {
            self.items.insert(0, created.clone());
        }
        Ok(created)
    }

    /// Send `{ id, ...patch }` and swap the stored record for the server's copy.
    pub async fn update(&mut self, id: Uuid, patch: R::Patch) -> Result<R::Record, ClientError> {
        let result = match R::prepare_patch(patch).and_then(|patch| with_id(id, &patch)) {
            Ok(body) => {
                self.client
                    .send_json::<_, R::Record>(Method::PATCH, R::PATH, &body)
                    .await
            }
            Err(err) => Err(err),
        };
        let updated = self.track(result)?;
        if let Some(slot) = self.items.iter_mut().find(|item| R::id(item) == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        let result = self.client.delete(R::PATH, &id.to_string()).await;
        self.track(result)?;
        self.items.retain(|item| R::id(item) != id);
        Ok(())
    }

    fn track<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.error = None,
            Err(err) => self.error = Some(err.to_string()),
        }
        result
    }
}

fn with_id<P: Serialize>(id: Uuid, patch: &P) -> Result<Value, ClientError> {
    let mut body =
        serde_json::to_value(patch).map_err(|e| ClientError::InvalidInput(e.to_string()))?;
    body.as_object_mut()
        .ok_or_else(|| ClientError::InvalidInput("patch must be a JSON object".into()))?
        .insert("id".to_string(), Value::String(id.to_string()));
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{DELETE, GET, PATCH, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.base_url())
            .expect("client")
            .with_session("token")
    }

    fn image(id: Uuid, url: &str, caption: Option<&str>) -> Value {
        json!({
            "id": id,
            "url": url,
            "caption": caption,
            "createdAt": "2024-05-01T12:00:00Z",
            "updatedAt": "2024-05-01T12:00:00Z"
        })
    }

    #[test]
    fn dates_are_normalized_to_the_utc_day() {
        assert_eq!(normalize_date("2024-06-01").ok().as_deref(), Some("2024-06-01"));
        assert_eq!(
            normalize_date("2024-06-01T23:30:00-02:00").ok().as_deref(),
            Some("2024-06-02")
        );
        assert_eq!(
            normalize_date("2024-06-01T09:30").ok().as_deref(),
            Some("2024-06-01")
        );
        assert!(matches!(
            normalize_date("someday"),
            Err(ClientError::InvalidInput(message)) if message == "Invalid date format"
        ));
    }

    #[tokio::test]
    async fn mount_loads_the_collection() {
        let server = MockServer::start();
        let first = Uuid::new_v4();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/gallery");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([image(first, "/uploads/a.jpg", None)]));
        });

        let store = CollectionStore::<Gallery>::mount(client(&server)).await;

        mock.assert();
        assert_eq!(store.state(), &LoadState::Ready);
        assert!(!store.is_loading());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].id, first);
    }

    #[tokio::test]
    async fn failed_load_reports_the_server_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/events");
            then.status(500)
                .header("content-type", "application/json")
                .json_body(json!({ "error": "Failed to fetch events" }));
        });

        let store = CollectionStore::<Events>::mount(client(&server)).await;

        assert_eq!(
            store.state(),
            &LoadState::Failed("Failed to fetch events".to_string())
        );
        assert_eq!(store.error(), Some("Failed to fetch events"));
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn mutations_fold_server_answers_into_the_list() {
        let server = MockServer::start();
        let existing = Uuid::new_v4();
        let created = Uuid::new_v4();
        server.mock(|when, then| {
            when.method(GET).path("/api/gallery");
            then.status(200)
                .json_body(json!([image(existing, "/uploads/a.jpg", Some("old"))]));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/api/gallery")
                .header("cookie", "adminSession=token")
                .json_body(json!({ "url": "/uploads/b.jpg" }));
            then.status(200)
                .json_body(image(created, "/uploads/b.jpg", None));
        });
        let update = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/gallery")
                .json_body(json!({ "id": existing, "caption": null }));
            then.status(200)
                .json_body(image(existing, "/uploads/a.jpg", None));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE)
                .path("/api/gallery")
                .query_param("id", created.to_string());
            then.status(200).json_body(json!({ "success": true }));
        });

        let mut store = CollectionStore::<Gallery>::mount(client(&server)).await;

        store
            .create(&GalleryImageInput {
                url: Some("/uploads/b.jpg".into()),
                caption: None,
            })
            .await
            .expect("create");
        let ids: Vec<Uuid> = store.items().iter().map(|item| item.id).collect();
        assert_eq!(ids, [created, existing]);

        store
            .update(
                existing,
                GalleryImagePatch {
                    caption: Some(None),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(store.items()[1].caption, None);

        store.delete(created).await.expect("delete");
        let ids: Vec<Uuid> = store.items().iter().map(|item| item.id).collect();
        assert_eq!(ids, [existing]);

        create.assert();
        update.assert();
        delete.assert();
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn new_coaches_join_the_end_of_the_roster() {
        let server = MockServer::start();
        let coach = |id: Uuid, name: &str| {
            json!({
                "id": id,
                "name": name,
                "role": "Coach",
                "bio": ["Hi"],
                "certifications": [],
                "achievements": [],
                "image": "",
                "createdAt": "2024-05-01T12:00:00Z",
                "updatedAt": "2024-05-01T12:00:00Z"
            })
        };
        let existing = Uuid::new_v4();
        let created = Uuid::new_v4();
        server.mock(|when, then| {
            when.method(GET).path("/api/coaches");
            then.status(200).json_body(json!([coach(existing, "Riley")]));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/api/coaches")
                .json_body(json!({ "name": "Sam", "role": "Coach", "bio": ["Hi"] }));
            then.status(200).json_body(coach(created, "Sam"));
        });

        let mut store = CollectionStore::<Coaches>::mount(client(&server)).await;
        store
            .create(&CoachInput {
                name: Some("Sam".into()),
                role: Some("Coach".into()),
                bio: Some(vec!["Hi".into()]),
                ..Default::default()
            })
            .await
            .expect("create");

        create.assert();
        let names: Vec<&str> = store.items().iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Riley", "Sam"]);
    }

    #[tokio::test]
    async fn failed_mutations_leave_the_list_untouched() {
        let server = MockServer::start();
        let existing = Uuid::new_v4();
        server.mock(|when, then| {
            when.method(GET).path("/api/gallery");
            then.status(200)
                .json_body(json!([image(existing, "/uploads/a.jpg", None)]));
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/api/gallery");
            then.status(404)
                .json_body(json!({ "error": "Gallery image not found" }));
        });

        let mut store = CollectionStore::<Gallery>::mount(client(&server)).await;
        let err = store.delete(existing).await.expect_err("delete fails");

        assert_eq!(err.status(), Some(404));
        assert_eq!(store.error(), Some("Gallery image not found"));
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn datetime_local_event_dates_are_sent_as_calendar_days() {
        let server = MockServer::start();
        let id = Uuid::new_v4();
        let patch_mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/events")
                .json_body(json!({ "id": id, "date": "2024-06-01" }));
            then.status(200).json_body(json!({
                "id": id,
                "title": "Open House",
                "date": "2024-06-01T00:00:00Z",
                "time": "10am",
                "location": "Gym",
                "cost": "Free",
                "who": "Everyone",
                "description": "Tour",
                "image": null,
                "registrationLink": null,
                "promoCode": null,
                "createdAt": "2024-05-01T12:00:00Z",
                "updatedAt": "2024-05-02T12:00:00Z"
            }));
        });

        let mut store = CollectionStore::<Events>::new(client(&server));
        let updated = store
            .update(
                id,
                EventPatch {
                    date: Some("2024-06-01T09:30".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        patch_mock.assert();
        assert_eq!(updated.id, id);
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn event_patches_are_rejected_locally_on_bad_dates() {
        let server = MockServer::start();
        let patch_mock = server.mock(|when, then| {
            when.method(PATCH).path("/api/events");
            then.status(200).json_body(json!({}));
        });

        let mut store = CollectionStore::<Events>::new(client(&server));
        let err = store
            .update(
                Uuid::new_v4(),
                EventPatch {
                    date: Some("not a date".into()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("invalid date");

        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert_eq!(store.error(), Some("Invalid date format"));
        patch_mock.assert_hits(0);
    }
}
