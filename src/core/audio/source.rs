use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::decode_base64;
use crate::errors::audio_error::AudioError;

/// Where the audio for a detection request comes from
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioSource {
    /// Base64 audio, optionally prefixed with a `data:<mime>;base64,` header
    InlineBase64 { data: String },
    /// An http(s) URL the server downloads the audio from
    RemoteUrl { url: String },
}

impl AudioSource {
    /// Produce the raw container bytes, enforcing the payload size limit
    pub async fn resolve(
        &self,
        client: &reqwest::Client,
        timeout: Duration,
        limit: usize,
    ) -> Result<Vec<u8>, AudioError> {
        match self {
            AudioSource::InlineBase64 { data } => {
                let bytes = decode_base64(data)?;
                if bytes.len() > limit {
                    return Err(AudioError::TooLarge { limit });
                }
                Ok(bytes)
            }
            AudioSource::RemoteUrl { url } => fetch_remote(client, url, timeout, limit).await,
        }
    }
}

/// Download audio from an http(s) URL
///
/// The body is read incrementally and abandoned as soon as it exceeds
/// `limit` bytes.
pub async fn fetch_remote(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    limit: usize,
) -> Result<Vec<u8>, AudioError> {
    let parsed = Url::parse(url).map_err(|e| AudioError::Fetch(format!("invalid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AudioError::Fetch(format!(
            "unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }

    tracing::debug!(host = parsed.host_str().unwrap_or_default(), "Fetching remote audio");

    let mut response = client
        .get(parsed)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| AudioError::Fetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AudioError::Fetch(format!("remote server answered {status}")));
    }

    if let Some(length) = response.content_length()
        && length > limit as u64
    {
        return Err(AudioError::TooLarge { limit });
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AudioError::Fetch(e.to_string()))?
    {
        if body.len() + chunk.len() > limit {
            return Err(AudioError::TooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
