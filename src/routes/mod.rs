//! Router assembly
//!
//! - `api` - protected detection routes

pub mod api;

use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::handlers;
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Complete application router: public info routes plus protected detection
pub fn create_app(state: Arc<AppState>) -> Router {
    let protected_routes = api::create_api_router(state.config.max_request_body_bytes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public_routes = Router::new()
        .route("/", get(handlers::api::root_info))
        .route("/health", get(handlers::api::health_check));

    let app = public_routes.merge(protected_routes);

    #[cfg(feature = "openapi")]
    let app = app.merge(crate::docs::openapi::router());

    app.with_state(state)
}
