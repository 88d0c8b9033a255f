use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{GoogleSpeechAuth, GoogleSpeechConfig, GoogleSpeechRecognizer};
use crate::core::providers::google::MockTokenProvider;
use crate::core::stt::{STTError, SpeechRecognizer};

fn api_key_recognizer(server: &MockServer) -> GoogleSpeechRecognizer {
    let config = GoogleSpeechConfig::new(
        server.uri(),
        GoogleSpeechAuth::ApiKey("test-key".to_string()),
    );
    GoogleSpeechRecognizer::new(config, reqwest::Client::new()).unwrap()
}

#[tokio::test]
async fn test_recognize_with_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "config": {"languageCode": "ta-IN", "sampleRateHertz": 16000}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"alternatives": [{"transcript": "நான் வீட்டுக்கு", "confidence": 0.7}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let recognizer = api_key_recognizer(&server);
    let result = recognizer.recognize(b"RIFF", 16_000, "ta-IN").await.unwrap();

    assert_eq!(result.transcript, "நான் வீட்டுக்கு");
    assert_eq!(result.confidence, Some(0.7));
    assert_eq!(recognizer.provider_name(), "google");
}

#[tokio::test]
async fn test_recognize_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .and(header("authorization", "Bearer token-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"alternatives": [{"transcript": "hello"}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = GoogleSpeechConfig::new(
        server.uri(),
        GoogleSpeechAuth::Credentials(String::new()),
    );
    let recognizer = GoogleSpeechRecognizer::with_token_provider(
        config,
        reqwest::Client::new(),
        Arc::new(MockTokenProvider {
            result: Ok("token-abc".to_string()),
        }),
    );

    let result = recognizer.recognize(b"RIFF", 8_000, "en-IN").await.unwrap();
    assert_eq!(result.transcript, "hello");
    assert_eq!(result.confidence, None);
}

#[tokio::test]
async fn test_token_failure_is_authentication_error() {
    let server = MockServer::start().await;

    let config = GoogleSpeechConfig::new(
        server.uri(),
        GoogleSpeechAuth::Credentials(String::new()),
    );
    let recognizer = GoogleSpeechRecognizer::with_token_provider(
        config,
        reqwest::Client::new(),
        Arc::new(MockTokenProvider {
            result: Err("expired".to_string()),
        }),
    );

    let err = recognizer.recognize(b"RIFF", 16_000, "en-IN").await.unwrap_err();
    assert_eq!(err, STTError::AuthenticationFailed("expired".to_string()));
}

#[tokio::test]
async fn test_empty_results_is_no_speech() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let recognizer = api_key_recognizer(&server);
    let err = recognizer.recognize(b"RIFF", 16_000, "hi-IN").await.unwrap_err();
    assert_eq!(err, STTError::NoSpeech);
}

#[tokio::test]
async fn test_forbidden_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let recognizer = api_key_recognizer(&server);
    let err = recognizer.recognize(b"RIFF", 16_000, "en-IN").await.unwrap_err();
    assert_eq!(
        err,
        STTError::AuthenticationFailed("API key not valid".to_string())
    );
}

#[tokio::test]
async fn test_server_error_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let recognizer = api_key_recognizer(&server);
    let err = recognizer.recognize(b"RIFF", 16_000, "en-IN").await.unwrap_err();
    assert_eq!(err, STTError::ProviderError("HTTP 500: internal".to_string()));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut config = GoogleSpeechConfig::new(
        server.uri(),
        GoogleSpeechAuth::ApiKey("test-key".to_string()),
    );
    config.request_timeout = Duration::from_millis(50);
    let recognizer = GoogleSpeechRecognizer::new(config, reqwest::Client::new()).unwrap();

    let err = recognizer.recognize(b"RIFF", 16_000, "en-IN").await.unwrap_err();
    assert_eq!(err, STTError::Timeout(Duration::from_millis(50)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let config = GoogleSpeechConfig::new(
        "http://127.0.0.1:1",
        GoogleSpeechAuth::ApiKey("test-key".to_string()),
    );
    let recognizer = GoogleSpeechRecognizer::new(config, reqwest::Client::new()).unwrap();

    let err = recognizer.recognize(b"RIFF", 16_000, "en-IN").await.unwrap_err();
    assert!(matches!(err, STTError::NetworkError(_)), "got {err:?}");
}
