#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use branford::application::content::{
    CoachService, EventService, GalleryService, SpotlightService,
};
use branford::application::repos::{
    CoachesRepo, EventsRepo, GalleryRepo, HealthProbe, RepoError, SpotlightsRepo,
};
use branford::application::session::AdminSessionService;
use branford::config::RuntimeEnvironment;
use branford::domain::coaches::{CoachChanges, CoachDraft};
use branford::domain::dates::storage_timestamp;
use branford::domain::events::{EventChanges, EventDraft};
use branford::domain::gallery::{GalleryChanges, GalleryDraft};
use branford::domain::spotlights::{SpotlightChanges, SpotlightDraft};
use branford::infra::http::{self, ApiState};
use branford::infra::uploads::UploadStorage;
use branford_api_types::{Coach, Event, GalleryImage, MemberSpotlight};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use time::OffsetDateTime;
use time::macros::datetime;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "lift-heavy";
pub const SESSION_SECRET: &[u8] = b"integration-test-secret";
pub const UPLOAD_LIMIT: u64 = 15 * 1024 * 1024;

#[derive(Default)]
struct Store {
    events: Vec<Event>,
    spotlights: Vec<MemberSpotlight>,
    gallery: Vec<GalleryImage>,
    coaches: Vec<Coach>,
    ticks: i64,
}

impl Store {
    /// Strictly increasing timestamps so creation order is observable.
    fn tick(&mut self) -> OffsetDateTime {
        self.ticks += 1;
        datetime!(2024-01-01 00:00 UTC) + time::Duration::seconds(self.ticks)
    }
}

/// In-memory stand-in for the Postgres repositories.
#[derive(Default)]
pub struct MemoryRepositories {
    store: Mutex<Store>,
    unhealthy: AtomicBool,
}

impl MemoryRepositories {
    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.unhealthy.store(unhealthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventsRepo for MemoryRepositories {
    async fn list_events(&self) -> Result<Vec<Event>, RepoError> {
        let mut events = self.store.lock().await.events.clone();
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(events)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, RepoError> {
        let store = self.store.lock().await;
        Ok(store.events.iter().find(|event| event.id == id).cloned())
    }

    async fn create_event(&self, draft: EventDraft) -> Result<Event, RepoError> {
        let mut store = self.store.lock().await;
        let now = store.tick();
        let event = Event {
            id: Uuid::new_v4(),
            title: draft.title,
            date: storage_timestamp(draft.date),
            time: draft.time,
            location: draft.location,
            cost: draft.cost,
            who: draft.who,
            description: draft.description,
            image: draft.image,
            registration_link: draft.registration_link,
            promo_code: draft.promo_code,
            created_at: now,
            updated_at: now,
        };
        store.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> Result<Event, RepoError> {
        let mut store = self.store.lock().await;
        let now = store.tick();
        let event = store
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or(RepoError::NotFound)?;
        changes.apply(event);
        event.updated_at = now;
        Ok(event.clone())
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.lock().await;
        let before = store.events.len();
        store.events.retain(|event| event.id != id);
        if store.events.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl SpotlightsRepo for MemoryRepositories {
    async fn list_spotlights(&self) -> Result<Vec<MemberSpotlight>, RepoError> {
        let mut spotlights = self.store.lock().await.spotlights.clone();
        spotlights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(spotlights)
    }

    async fn find_spotlight(&self, id: Uuid) -> Result<Option<MemberSpotlight>, RepoError> {
        let store = self.store.lock().await;
        Ok(store.spotlights.iter().find(|item| item.id == id).cloned())
    }

    async fn create_spotlight(&self, draft: SpotlightDraft) -> Result<MemberSpotlight, RepoError> {
        let mut store = self.store.lock().await;
        let now = store.tick();
        let spotlight = MemberSpotlight {
            id: Uuid::new_v4(),
            name: draft.name,
            member_since: draft.member_since,
            quote: draft.quote,
            recent_achievement: draft.recent_achievement,
            image: draft.image,
            created_at: now,
            updated_at: now,
        };
        store.spotlights.push(spotlight.clone());
        Ok(spotlight)
    }

    async fn update_spotlight(
        &self,
        id: Uuid,
        changes: SpotlightChanges,
    ) -> Result<MemberSpotlight, RepoError> {
        let mut store = self.store.lock().await;
        let now = store.tick();
        let spotlight = store
            .spotlights
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RepoError::NotFound)?;
        changes.apply(spotlight);
        spotlight.updated_at = now;
        Ok(spotlight.clone())
    }

    async fn delete_spotlight(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.lock().await;
        let before = store.spotlights.len();
        store.spotlights.retain(|item| item.id != id);
        if store.spotlights.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl GalleryRepo for MemoryRepositories {
    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, RepoError> {
        let mut images = self.store.lock().await.gallery.clone();
        images.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(images)
    }

    async fn find_gallery_image(&self, id: Uuid) -> Result<Option<GalleryImage>, RepoError> {
        let store = self.store.lock().await;
        Ok(store.gallery.iter().find(|item| item.id == id).cloned())
    }

    async fn create_gallery_image(&self, draft: GalleryDraft) -> Result<GalleryImage, RepoError> {
        let mut store = self.store.lock().await;
        let now = store.tick();
        let image = GalleryImage {
            id: Uuid::new_v4(),
            url: draft.url,
            caption: draft.caption,
            created_at: now,
            updated_at: now,
        };
        store.gallery.push(image.clone());
        Ok(image)
    }

    async fn update_gallery_image(
        &self,
        id: Uuid,
        changes: GalleryChanges,
    ) -> Result<GalleryImage, RepoError> {
        let mut store = self.store.lock().await;
        let now = store.tick();
        let image = store
            .gallery
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RepoError::NotFound)?;
        changes.apply(image);
        image.updated_at = now;
        Ok(image.clone())
    }

    async fn delete_gallery_image(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.lock().await;
        let before = store.gallery.len();
        store.gallery.retain(|item| item.id != id);
        if store.gallery.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CoachesRepo for MemoryRepositories {
    async fn list_coaches(&self) -> Result<Vec<Coach>, RepoError> {
        let mut coaches = self.store.lock().await.coaches.clone();
        coaches.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(coaches)
    }

    async fn find_coach(&self, id: Uuid) -> Result<Option<Coach>, RepoError> {
        let store = self.store.lock().await;
        Ok(store.coaches.iter().find(|item| item.id == id).cloned())
    }

    async fn create_coach(&self, draft: CoachDraft) -> Result<Coach, RepoError> {
        let mut store = self.store.lock().await;
        let now = store.tick();
        let coach = Coach {
            id: Uuid::new_v4(),
            name: draft.name,
            role: draft.role,
            bio: draft.bio,
            certifications: draft.certifications,
            achievements: draft.achievements,
            image: draft.image,
            created_at: now,
            updated_at: now,
        };
        store.coaches.push(coach.clone());
        Ok(coach)
    }

    async fn update_coach(&self, id: Uuid, changes: CoachChanges) -> Result<Coach, RepoError> {
        let mut store = self.store.lock().await;
        let now = store.tick();
        let coach = store
            .coaches
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RepoError::NotFound)?;
        changes.apply(coach);
        coach.updated_at = now;
        Ok(coach.clone())
    }

    async fn delete_coach(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.lock().await;
        let before = store.coaches.len();
        store.coaches.retain(|item| item.id != id);
        if store.coaches.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for MemoryRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            Err(RepoError::Persistence("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub repos: Arc<MemoryRepositories>,
    pub sessions: Arc<AdminSessionService>,
    pub uploads_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_environment(RuntimeEnvironment::Development)
    }

    pub fn with_environment(environment: RuntimeEnvironment) -> Self {
        let repos = Arc::new(MemoryRepositories::default());
        let uploads_dir = TempDir::new().expect("tempdir");
        let storage = UploadStorage::new(uploads_dir.path().to_path_buf(), "/uploads", UPLOAD_LIMIT)
            .expect("upload storage");
        let sessions = Arc::new(AdminSessionService::new(
            Some(ADMIN_PASSWORD.to_string()),
            SESSION_SECRET,
            Duration::from_secs(3600),
        ));

        let events_repo: Arc<dyn EventsRepo> = repos.clone();
        let spotlights_repo: Arc<dyn SpotlightsRepo> = repos.clone();
        let gallery_repo: Arc<dyn GalleryRepo> = repos.clone();
        let coaches_repo: Arc<dyn CoachesRepo> = repos.clone();
        let health: Arc<dyn HealthProbe> = repos.clone();

        let state = ApiState {
            events: Arc::new(EventService::new(events_repo)),
            spotlights: Arc::new(SpotlightService::new(spotlights_repo)),
            gallery: Arc::new(GalleryService::new(gallery_repo)),
            coaches: Arc::new(CoachService::new(coaches_repo)),
            upload_storage: Arc::new(storage),
            sessions: sessions.clone(),
            health,
            environment,
            started_at: Instant::now(),
        };

        Self {
            router: http::build_router(state),
            repos,
            sessions,
            uploads_dir,
        }
    }

    pub fn session_cookie(&self) -> String {
        let issued = self
            .sessions
            .issue(OffsetDateTime::now_utc())
            .expect("session issued");
        format!("adminSession={}", issued.token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router responds")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).expect("request"))
            .await
    }

    /// JSON request carrying a valid admin session.
    pub async fn admin_json(&self, method: &str, uri: &str, body: Value) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, self.session_cookie())
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    pub async fn admin_delete(&self, uri: &str) -> Response<Body> {
        let request = Request::delete(uri)
            .header(header::COOKIE, self.session_cookie())
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}

pub fn sample_event(title: &str, date: &str) -> Value {
    serde_json::json!({
        "title": title,
        "date": date,
        "time": "10am-2pm",
        "location": "Gym",
        "cost": "Free",
        "who": "Everyone",
        "description": "Come see the gym."
    })
}

/// Build a multipart body with a single field.
pub fn multipart_body(
    boundary: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
