//! OpenAPI specification and documentation
//!
//! This module provides OpenAPI documentation for the Voice Detection API.
//! It is only compiled when the `openapi` feature is enabled.

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

use crate::core::audio::AudioSource;
use crate::core::detection::{
    Classification, DetectionResult, Language, Level, QualityReport, Segment,
};
use crate::handlers::{
    api::{EndpointIndex, HealthResponse, ServiceInfo},
    detection::PredictRequest,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Voice Detection API",
        version = "1.0.0",
        description = "Classifies speech recordings as AI-generated or human, with quality, language and per-second breakdown"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    paths(
        crate::handlers::api::root_info,
        crate::handlers::api::health_check,
        crate::handlers::detection::voice_detection_handler,
        crate::handlers::detection::predict_handler,
    ),
    components(schemas(
        HealthResponse,
        ServiceInfo,
        EndpointIndex,
        AudioSource,
        PredictRequest,
        DetectionResult,
        QualityReport,
        Segment,
        Classification,
        Level,
        Language,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service information and health"),
        (name = "detection", description = "AI-generated voice detection")
    )
)]
pub struct ApiDoc;

/// Security scheme configuration
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let key = utoipa::openapi::security::ApiKeyValue::with_description(
                "x-api-key",
                "API key configured through API_KEY. `Authorization: Bearer <key>` is accepted too.",
            );

            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(key),
                ),
            )
        }
    }
}

/// Routes serving the spec:
/// - `GET /docs/openapi.json`
/// - `GET /docs/openapi.yaml`
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/docs/openapi.json", get(openapi_json_handler))
        .route("/docs/openapi.yaml", get(openapi_yaml_handler))
}

async fn openapi_json_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn openapi_yaml_handler() -> ([(axum::http::header::HeaderName, &'static str); 1], String) {
    let yaml = spec_yaml().unwrap_or_else(|e| format!("Error generating YAML: {e}"));
    ([(axum::http::header::CONTENT_TYPE, "application/yaml")], yaml)
}

/// Spec as YAML, used by the `openapi` CLI command
pub fn spec_yaml() -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ApiDoc::openapi())
}

/// Spec as pretty-printed JSON
pub fn spec_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ApiDoc::openapi())
}
