use axum::response::Json;
use serde::Serialize;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
    /// Always "ok" while the server is accepting requests
    #[cfg_attr(feature = "openapi", schema(example = "ok"))]
    pub status: &'static str,
}

/// Paths served by this process
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EndpointIndex {
    pub health: &'static str,
    pub detect: &'static str,
    pub predict: &'static str,
    pub docs: &'static str,
}

/// Service description returned at the root path
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointIndex,
    pub status: &'static str,
}

/// Root handler describing the service
#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        get,
        path = "/",
        responses((status = 200, description = "Service information", body = ServiceInfo)),
        tag = "health"
    )
)]
pub async fn root_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Voice Detection API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointIndex {
            health: "/health",
            detect: "/api/voice-detection",
            predict: "/predict",
            docs: "/docs/openapi.json",
        },
        status: "running",
    })
}

/// Health check handler
#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        get,
        path = "/health",
        responses((status = 200, description = "Server is healthy", body = HealthResponse)),
        tag = "health"
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
