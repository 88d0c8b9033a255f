use std::f64::consts::PI;
use std::io::Cursor;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voice_detection::{ServerConfig, routes, state::AppState};

const API_KEY: &str = "test-api-key";
const GOOGLE_KEY: &str = "google-test-key";
const RECOGNIZE_PATH: &str = "/v1/speech:recognize";

fn config_for(server: &MockServer) -> ServerConfig {
    ServerConfig {
        api_key: Some(API_KEY.to_string()),
        google_api_key: Some(GOOGLE_KEY.to_string()),
        speech_endpoint: server.uri(),
        recognition_timeout_seconds: 2,
        ..Default::default()
    }
}

fn tone_wav() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for n in 0..24_000 {
            let value = 0.4 * (2.0 * PI * 220.0 * f64::from(n) / 16_000.0).sin();
            writer.write_sample((value * 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

async fn detect(app: Router) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri("/api/voice-detection")
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(
            json!({"kind": "inline_base64", "data": BASE64.encode(tone_wav())}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn mount_transcript(server: &MockServer, locale: &str, transcript: &str, confidence: f64) {
    Mock::given(method("POST"))
        .and(path(RECOGNIZE_PATH))
        .and(query_param("key", GOOGLE_KEY))
        .and(body_partial_json(json!({"config": {"languageCode": locale}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"alternatives": [{"transcript": transcript, "confidence": confidence}]}]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_stop_words_outweigh_raw_confidence() {
    let server = MockServer::start().await;

    mount_transcript(&server, "en-IN", "hello world", 0.9).await;
    mount_transcript(&server, "ta-IN", "நான் ஒரு இல்லை", 0.7).await;

    // Remaining locales hear nothing
    Mock::given(method("POST"))
        .and(path(RECOGNIZE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .with_priority(10)
        .expect(3)
        .mount(&server)
        .await;

    let app = routes::create_app(AppState::new(config_for(&server)).unwrap());
    let json = detect(app).await;

    assert_eq!(json["detected_language"], "Tamil");
}

#[tokio::test]
async fn test_confident_english_wins_ties() {
    let server = MockServer::start().await;

    mount_transcript(&server, "en-IN", "this is a test", 0.8).await;
    mount_transcript(&server, "hi-IN", "है का की", 0.8).await;

    Mock::given(method("POST"))
        .and(path(RECOGNIZE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .with_priority(10)
        .mount(&server)
        .await;

    let app = routes::create_app(AppState::new(config_for(&server)).unwrap());
    let json = detect(app).await;

    // Both score 1.1; the earlier candidate is kept
    assert_eq!(json["detected_language"], "English");
}

#[tokio::test]
async fn test_failing_service_falls_back_to_english() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RECOGNIZE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .expect(5)
        .mount(&server)
        .await;

    let app = routes::create_app(AppState::new(config_for(&server)).unwrap());
    let json = detect(app).await;

    assert_eq!(json["detected_language"], "English");
    assert_eq!(json["classification"], "HUMAN");
}

#[tokio::test]
async fn test_disabled_language_detection_never_calls_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let config = ServerConfig {
        language_detection: false,
        ..config_for(&server)
    };
    let app = routes::create_app(AppState::new(config).unwrap());
    let json = detect(app).await;

    assert_eq!(json["detected_language"], "English");
}
