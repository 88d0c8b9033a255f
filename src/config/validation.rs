use super::ServerConfig;

/// Validate the merged server configuration
///
/// Runs every individual check and returns the first failure.
pub fn validate_config(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_timeouts(
        config.recognition_timeout_seconds,
        config.fetch_timeout_seconds,
    )?;
    validate_max_audio_bytes(config.max_audio_bytes)?;
    validate_speech_endpoint(&config.speech_endpoint)?;
    Ok(())
}

/// Validate that both network timeouts are non-zero
pub fn validate_timeouts(
    recognition_timeout_seconds: u64,
    fetch_timeout_seconds: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    if recognition_timeout_seconds == 0 {
        return Err("RECOGNITION_TIMEOUT_SECONDS must be greater than zero".into());
    }
    if fetch_timeout_seconds == 0 {
        return Err("FETCH_TIMEOUT_SECONDS must be greater than zero".into());
    }
    Ok(())
}

/// Validate the audio payload limit
pub fn validate_max_audio_bytes(max_audio_bytes: usize) -> Result<(), Box<dyn std::error::Error>> {
    if max_audio_bytes == 0 {
        return Err("MAX_AUDIO_BYTES must be greater than zero".into());
    }
    Ok(())
}

/// Validate that the speech endpoint is an absolute http(s) URL
pub fn validate_speech_endpoint(endpoint: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = url::Url::parse(endpoint)
        .map_err(|e| format!("GOOGLE_SPEECH_ENDPOINT is not a valid URL: {e}"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!(
            "GOOGLE_SPEECH_ENDPOINT must use http or https, got '{}'",
            parsed.scheme()
        )
        .into());
    }

    Ok(())
}
