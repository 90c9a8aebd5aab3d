use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

pub const CONTENT_MUTATIONS_TOTAL: &str = "branford_content_mutations_total";
pub const UPLOADS_TOTAL: &str = "branford_uploads_total";
pub const UPLOADS_REJECTED_TOTAL: &str = "branford_uploads_rejected_total";
pub const UPLOAD_BYTES: &str = "branford_upload_bytes";
pub const HTTP_REQUEST_MS: &str = "branford_http_request_ms";

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            CONTENT_MUTATIONS_TOTAL,
            Unit::Count,
            "Content records created, updated or deleted, labelled by collection and action."
        );
        describe_counter!(
            UPLOADS_TOTAL,
            Unit::Count,
            "Image files accepted and written to upload storage."
        );
        describe_counter!(
            UPLOADS_REJECTED_TOTAL,
            Unit::Count,
            "Uploads refused before storage, labelled by reason."
        );
        describe_histogram!(
            UPLOAD_BYTES,
            Unit::Bytes,
            "Size of accepted uploads in bytes."
        );
        describe_histogram!(
            HTTP_REQUEST_MS,
            Unit::Milliseconds,
            "HTTP request latency in milliseconds, labelled by status class."
        );
    });
}
