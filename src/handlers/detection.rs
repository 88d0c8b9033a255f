use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::core::audio::{AudioSource, decode_audio};
use crate::core::detection::DetectionResult;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Body accepted by `/predict`
///
/// Either the tagged [`AudioSource`] or the older `{"audio_data": "<base64>"}`.
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum PredictRequest {
    Source(AudioSource),
    Legacy {
        /// Base64 audio, optionally with a data-URI header
        audio_data: String,
    },
}

impl From<PredictRequest> for AudioSource {
    fn from(request: PredictRequest) -> Self {
        match request {
            PredictRequest::Source(source) => source,
            PredictRequest::Legacy { audio_data } => AudioSource::InlineBase64 { data: audio_data },
        }
    }
}

/// Turn a JSON extractor rejection into a 400
fn bad_json(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

/// Resolve, decode and analyze one audio source
async fn run_detection(state: &AppState, source: AudioSource) -> AppResult<DetectionResult> {
    let bytes = source
        .resolve(
            &state.http_client,
            state.config.fetch_timeout(),
            state.config.max_audio_bytes,
        )
        .await?;

    let received = bytes.len();
    let waveform = tokio::task::spawn_blocking(move || decode_audio(&bytes)).await??;

    info!(
        bytes = received,
        sample_rate = waveform.sample_rate(),
        duration_seconds = waveform.duration_seconds(),
        "Audio decoded"
    );

    Ok(state.detector.detect(waveform).await?)
}

/// Classify a recording as AI-generated or human
#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        post,
        path = "/api/voice-detection",
        request_body = AudioSource,
        responses(
            (status = 200, description = "Detection result", body = DetectionResult),
            (status = 400, description = "Malformed body or undecodable audio"),
            (status = 401, description = "Missing or invalid API key"),
            (status = 500, description = "Internal server error")
        ),
        security(("api_key" = [])),
        tag = "detection"
    )
)]
pub async fn voice_detection_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AudioSource>, JsonRejection>,
) -> AppResult<Json<DetectionResult>> {
    let Json(source) = payload.map_err(bad_json)?;
    Ok(Json(run_detection(&state, source).await?))
}

/// Same as `/api/voice-detection`, also accepting `{"audio_data": ...}`
#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        post,
        path = "/predict",
        request_body = PredictRequest,
        responses(
            (status = 200, description = "Detection result", body = DetectionResult),
            (status = 400, description = "Malformed body or undecodable audio"),
            (status = 401, description = "Missing or invalid API key"),
            (status = 500, description = "Internal server error")
        ),
        security(("api_key" = [])),
        tag = "detection"
    )
)]
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<DetectionResult>> {
    let Json(request) = payload.map_err(bad_json)?;
    Ok(Json(run_detection(&state, request.into()).await?))
}
