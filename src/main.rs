use std::{process, sync::Arc, time::Instant};

use branford::{
    application::{
        content::{CoachService, EventService, GalleryService, SpotlightService},
        error::AppError,
        repos::{CoachesRepo, EventsRepo, GalleryRepo, HealthProbe, SpotlightsRepo},
        seed::seed_sample_content,
        session::AdminSessionService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
        uploads::UploadStorage,
    },
};
use time::OffsetDateTime;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;
use uuid::Uuid;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Seed(_) => run_seed(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = Arc::new(init_repositories(&settings).await?);

    let upload_storage = UploadStorage::new(
        settings.uploads.directory.clone(),
        settings.uploads.public_prefix.clone(),
        settings.uploads.max_file_bytes.get(),
    )
    .map_err(|source| InfraError::UploadDirectory {
        path: settings.uploads.directory.clone(),
        source,
    })?;

    let sessions = build_session_service(&settings.admin);

    let events_repo: Arc<dyn EventsRepo> = repositories.clone();
    let spotlights_repo: Arc<dyn SpotlightsRepo> = repositories.clone();
    let gallery_repo: Arc<dyn GalleryRepo> = repositories.clone();
    let coaches_repo: Arc<dyn CoachesRepo> = repositories.clone();
    let health: Arc<dyn HealthProbe> = repositories;

    let state = ApiState {
        events: Arc::new(EventService::new(events_repo)),
        spotlights: Arc::new(SpotlightService::new(spotlights_repo)),
        gallery: Arc::new(GalleryService::new(gallery_repo)),
        coaches: Arc::new(CoachService::new(coaches_repo)),
        upload_storage: Arc::new(upload_storage),
        sessions: Arc::new(sessions),
        health,
        environment: settings.server.environment,
        started_at: Instant::now(),
    };

    let router = http::build_router(state);
    serve_http(settings.server.addr, router).await
}

async fn run_seed(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let today = OffsetDateTime::now_utc().date();

    let report = seed_sample_content(
        &repositories,
        &repositories,
        &repositories,
        &repositories,
        today,
    )
    .await
    .map_err(|err| AppError::unexpected(format!("failed to seed content: {err}")))?;

    info!(
        target = "branford::seed",
        events = report.events,
        member_spotlights = report.member_spotlights,
        gallery_images = report.gallery_images,
        coaches = report.coaches,
        "sample content seeded",
    );
    Ok(())
}

fn build_session_service(admin: &config::AdminSettings) -> AdminSessionService {
    let secret = match admin.session_secret.as_ref() {
        Some(secret) => secret.clone().into_bytes(),
        None => {
            warn!(
                target = "branford::admin::session",
                "no session secret configured; sessions will not survive a restart"
            );
            format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()).into_bytes()
        }
    };

    let sessions = AdminSessionService::new(admin.password.clone(), &secret, admin.session_ttl);
    if !sessions.login_enabled() {
        warn!(
            target = "branford::admin::session",
            "no admin password configured; admin login is disabled"
        );
    }
    sessions
}

async fn init_repositories(settings: &config::Settings) -> Result<PostgresRepositories, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| InfraError::database(err.to_string()))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    Ok(PostgresRepositories::new(pool))
}

async fn serve_http(addr: std::net::SocketAddr, router: axum::Router) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| InfraError::Bind { addr, source })?;

    info!(target = "branford::http", %addr, "listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::from(InfraError::Serve(err)))
}
