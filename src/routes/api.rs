use axum::{Router, extract::DefaultBodyLimit, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::detection;
use crate::state::AppState;
use std::sync::Arc;

/// Detection routes; callers add the auth layer
///
/// `body_limit` caps the JSON body, which carries base64 audio.
pub fn create_api_router(body_limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/voice-detection", post(detection::voice_detection_handler))
        .route("/predict", post(detection::predict_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
