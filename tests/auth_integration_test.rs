use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
    middleware,
    routing::get,
};
use std::sync::Arc;
use tower::ServiceExt;
use voice_detection::{ServerConfig, middleware::auth::auth_middleware, routes, state::AppState};

const API_KEY: &str = "integration-secret";

fn create_test_state(api_key: Option<&str>) -> Arc<AppState> {
    let config = ServerConfig {
        host: "localhost".to_string(),
        port: 3001,
        api_key: api_key.map(str::to_string),
        language_detection: false,
        ..Default::default()
    };

    AppState::new(config).unwrap()
}

/// Helper handler that returns 200 OK
async fn test_handler() -> &'static str {
    "OK"
}

fn protected_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/test", get(test_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

async fn error_code(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_missing_key_is_rejected() {
    let app = protected_app(create_test_state(Some(API_KEY)));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/test")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "missing_api_key");
}

#[tokio::test]
async fn test_wrong_key_is_rejected() {
    let app = protected_app(create_test_state(Some(API_KEY)));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/test")
        .header("x-api-key", "integration-secreT")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "invalid_api_key");
}

#[tokio::test]
async fn test_unconfigured_server_rejects_everything() {
    let app = protected_app(create_test_state(None));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/test")
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "unauthorized");
}

#[tokio::test]
async fn test_header_key_is_accepted() {
    let app = protected_app(create_test_state(Some(API_KEY)));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/test")
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_key_is_accepted() {
    let app = protected_app(create_test_state(Some(API_KEY)));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/test")
        .header("authorization", format!("Bearer {API_KEY}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_routes_skip_auth() {
    let app = routes::create_app(create_test_state(None));

    for uri in ["/", "/health"] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_detection_routes_require_key() {
    let app = routes::create_app(create_test_state(Some(API_KEY)));

    for uri in ["/api/voice-detection", "/predict"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"audio_data": "AAAA"}"#))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(error_code(response).await, "missing_api_key");
    }
}
