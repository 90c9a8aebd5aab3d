use std::sync::Arc;
use std::time::Instant;

use crate::application::content::{CoachService, EventService, GalleryService, SpotlightService};
use crate::application::repos::HealthProbe;
use crate::application::session::AdminSessionService;
use crate::config::RuntimeEnvironment;
use crate::infra::uploads::UploadStorage;

#[derive(Clone)]
pub struct ApiState {
    pub events: Arc<EventService>,
    pub spotlights: Arc<SpotlightService>,
    pub gallery: Arc<GalleryService>,
    pub coaches: Arc<CoachService>,
    pub upload_storage: Arc<UploadStorage>,
    pub sessions: Arc<AdminSessionService>,
    pub health: Arc<dyn HealthProbe>,
    pub environment: RuntimeEnvironment,
    pub started_at: Instant,
}
