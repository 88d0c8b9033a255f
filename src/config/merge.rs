use std::env;

use super::utils::parse_bool;
use super::yaml::YamlConfig;
use super::{
    DEFAULT_FETCH_TIMEOUT_SECONDS, DEFAULT_MAX_AUDIO_BYTES, DEFAULT_PORT,
    DEFAULT_RECOGNITION_TIMEOUT_SECONDS, DEFAULT_SPEECH_ENDPOINT, ServerConfig,
};

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. YAML configuration values
/// 2. Environment variables
/// 3. Default values
///
/// # Arguments
/// * `yaml_config` - Optional YAML configuration to use as overrides
///
/// # Returns
/// * `Result<ServerConfig, Box<dyn std::error::Error>>` - The merged configuration or an error
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();

    // Helper macro to get value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            $yaml_value
                .or_else(|| env::var($env_var).ok())
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Helper macro for optional values: YAML > ENV
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            $yaml_value.or_else(|| env::var($env_var).ok())
        };
    }

    // Helper macro for numeric values: YAML > ENV (parsed) > Default
    macro_rules! get_number {
        ($env_var:expr, $yaml_value:expr, $default:expr, $ty:ty) => {
            if let Some(value) = $yaml_value {
                value
            } else if let Ok(raw) = env::var($env_var) {
                raw.parse::<$ty>()
                    .map_err(|e| format!("Invalid {} environment variable: {e}", $env_var))?
            } else {
                $default
            }
        };
    }

    // Server configuration
    let host = get_value!(
        "HOST",
        yaml.server.as_ref().and_then(|s| s.host.clone()),
        "0.0.0.0"
    );

    let port = get_number!(
        "PORT",
        yaml.server.as_ref().and_then(|s| s.port),
        DEFAULT_PORT,
        u16
    );

    // Authentication
    let api_key = get_optional!("API_KEY", yaml.auth.as_ref().and_then(|a| a.api_key.clone()));

    // Speech recognition
    let google_api_key = get_optional!(
        "GOOGLE_SPEECH_API_KEY",
        yaml.speech.as_ref().and_then(|s| s.api_key.clone())
    );

    // Google Cloud credentials (can be path, JSON content, or empty for ADC)
    let google_credentials = get_optional!(
        "GOOGLE_APPLICATION_CREDENTIALS",
        yaml.speech.as_ref().and_then(|s| s.credentials.clone())
    );

    let speech_endpoint = get_value!(
        "GOOGLE_SPEECH_ENDPOINT",
        yaml.speech.as_ref().and_then(|s| s.endpoint.clone()),
        DEFAULT_SPEECH_ENDPOINT
    );

    let recognition_timeout_seconds = get_number!(
        "RECOGNITION_TIMEOUT_SECONDS",
        yaml.speech.as_ref().and_then(|s| s.timeout_seconds),
        DEFAULT_RECOGNITION_TIMEOUT_SECONDS,
        u64
    );

    let language_detection = yaml
        .speech
        .as_ref()
        .and_then(|s| s.language_detection)
        .or_else(|| {
            env::var("LANGUAGE_DETECTION")
                .ok()
                .and_then(|v| parse_bool(&v))
        })
        .unwrap_or(true);

    // Input limits
    let fetch_timeout_seconds = get_number!(
        "FETCH_TIMEOUT_SECONDS",
        yaml.input.as_ref().and_then(|i| i.fetch_timeout_seconds),
        DEFAULT_FETCH_TIMEOUT_SECONDS,
        u64
    );

    let max_audio_bytes = get_number!(
        "MAX_AUDIO_BYTES",
        yaml.input.as_ref().and_then(|i| i.max_audio_bytes),
        DEFAULT_MAX_AUDIO_BYTES,
        usize
    );

    Ok(ServerConfig {
        host,
        port,
        api_key,
        google_api_key,
        google_credentials,
        speech_endpoint,
        recognition_timeout_seconds,
        language_detection,
        fetch_timeout_seconds,
        max_audio_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::super::yaml::{AuthYaml, InputYaml, ServerYaml, SpeechYaml};
    use super::*;
    use serial_test::serial;

    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("API_KEY");
            env::remove_var("GOOGLE_SPEECH_API_KEY");
            env::remove_var("GOOGLE_APPLICATION_CREDENTIALS");
            env::remove_var("GOOGLE_SPEECH_ENDPOINT");
            env::remove_var("RECOGNITION_TIMEOUT_SECONDS");
            env::remove_var("LANGUAGE_DETECTION");
            env::remove_var("FETCH_TIMEOUT_SECONDS");
            env::remove_var("MAX_AUDIO_BYTES");
        }
    }

    #[test]
    #[serial]
    fn test_merge_defaults() {
        cleanup_env_vars();

        let config = merge_config(None).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.api_key.is_none());
        assert!(config.google_api_key.is_none());
        assert!(config.google_credentials.is_none());
        assert_eq!(config.speech_endpoint, DEFAULT_SPEECH_ENDPOINT);
        assert_eq!(
            config.recognition_timeout_seconds,
            DEFAULT_RECOGNITION_TIMEOUT_SECONDS
        );
        assert!(config.language_detection);
        assert_eq!(config.fetch_timeout_seconds, DEFAULT_FETCH_TIMEOUT_SECONDS);
        assert_eq!(config.max_audio_bytes, DEFAULT_MAX_AUDIO_BYTES);
    }

    #[test]
    #[serial]
    fn test_merge_yaml_overrides_env() {
        cleanup_env_vars();

        unsafe {
            env::set_var("HOST", "10.0.0.1");
            env::set_var("API_KEY", "env-key");
            env::set_var("GOOGLE_SPEECH_API_KEY", "env-speech");
            env::set_var("LANGUAGE_DETECTION", "true");
        }

        let yaml = YamlConfig {
            server: Some(ServerYaml {
                host: Some("127.0.0.1".to_string()),
                port: Some(8080),
            }),
            auth: Some(AuthYaml {
                api_key: Some("yaml-key".to_string()),
            }),
            speech: Some(SpeechYaml {
                language_detection: Some(false),
                ..Default::default()
            }),
            input: Some(InputYaml {
                max_audio_bytes: Some(2048),
                ..Default::default()
            }),
        };

        let config = merge_config(Some(yaml)).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_key.as_deref(), Some("yaml-key"));
        // Env fills fields the YAML leaves out
        assert_eq!(config.google_api_key.as_deref(), Some("env-speech"));
        assert!(!config.language_detection);
        assert_eq!(config.max_audio_bytes, 2048);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_invalid_env_number() {
        cleanup_env_vars();

        unsafe {
            env::set_var("RECOGNITION_TIMEOUT_SECONDS", "soon");
        }

        let result = merge_config(None);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid RECOGNITION_TIMEOUT_SECONDS")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_invalid_port() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "not-a-port");
        }

        let result = merge_config(None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid PORT"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_language_detection_from_env() {
        cleanup_env_vars();

        unsafe {
            env::set_var("LANGUAGE_DETECTION", "no");
        }

        let config = merge_config(None).unwrap();
        assert!(!config.language_detection);

        cleanup_env_vars();
    }
}
