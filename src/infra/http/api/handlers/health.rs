use std::time::Instant;

use axum::Json;
use axum::extract::State;
use branford_api_types::HealthResponse;
use time::OffsetDateTime;
use tracing::warn;

use crate::infra::http::api::state::ApiState;

/// Liveness report. Always answers 200; a failed store probe is reported in the body.
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let probe_started = Instant::now();
    let probe = state.health.ping().await;
    let response_time = u64::try_from(probe_started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (database, database_error) = match probe {
        Ok(()) => ("connected", None),
        Err(err) => {
            warn!(
                target = "branford::http::health",
                error = %err,
                "database probe failed",
            );
            (
                "error",
                state
                    .environment
                    .is_development()
                    .then(|| err.to_string()),
            )
        }
    };

    Json(HealthResponse {
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: OffsetDateTime::now_utc(),
        environment: state.environment.as_str().to_string(),
        database: database.to_string(),
        response_time,
        database_error,
    })
}
