//! Google Cloud credentials and OAuth2 access tokens.
//!
//! Credentials come from one configuration string:
//!
//! - empty: Application Default Credentials (`GOOGLE_APPLICATION_CREDENTIALS`,
//!   the GCP metadata server, or `gcloud auth application-default login`)
//! - starting with `{`: inline service account JSON
//! - anything else: path to a service account or authorized user JSON file

use std::path::Path;

use google_cloud_auth::credentials::{
    Builder as CredentialsBuilder, CacheableResource, Credentials, service_account, user_account,
};
use http::Extensions;
use tracing::{debug, error};

use super::error::GoogleError;

/// Where Google Cloud credentials are loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    ApplicationDefault,
    JsonContent(String),
    FilePath(String),
}

impl CredentialSource {
    /// Classify a credentials setting (see the module docs).
    pub fn from_setting(value: &str) -> Self {
        if value.trim().is_empty() {
            CredentialSource::ApplicationDefault
        } else if value.trim_start().starts_with('{') {
            CredentialSource::JsonContent(value.to_string())
        } else {
            CredentialSource::FilePath(value.to_string())
        }
    }

    /// Cheap sanity checks before any network activity.
    ///
    /// # Errors
    ///
    /// Returns `GoogleError::ConfigurationError` for malformed JSON, path
    /// traversal, or a missing credentials file.
    pub fn validate(&self) -> Result<(), GoogleError> {
        match self {
            CredentialSource::ApplicationDefault => Ok(()),
            CredentialSource::JsonContent(json) => {
                serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(json)
                    .map(|_| ())
                    .map_err(|e| {
                        GoogleError::ConfigurationError(format!(
                            "Invalid JSON content: must be a JSON object ({e})"
                        ))
                    })
            }
            CredentialSource::FilePath(path) => {
                if path.contains("..") {
                    return Err(GoogleError::ConfigurationError(
                        "Invalid credential file path: path traversal not allowed".to_string(),
                    ));
                }
                if !Path::new(path).exists() {
                    return Err(GoogleError::ConfigurationError(format!(
                        "Credential file not found: {path}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Source of OAuth2 bearer tokens for Google Cloud APIs.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a currently valid access token, refreshing if needed.
    async fn get_token(&self) -> Result<String, GoogleError>;
}

/// Token provider backed by `google-cloud-auth` credentials.
pub struct GoogleAuthClient {
    credentials: Credentials,
}

impl std::fmt::Debug for GoogleAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAuthClient")
            .field("credentials", &"<credentials>")
            .finish()
    }
}

impl GoogleAuthClient {
    /// Load credentials from `source` for the given OAuth2 scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be loaded or are invalid.
    pub fn new<S: AsRef<str>>(source: CredentialSource, scopes: &[S]) -> Result<Self, GoogleError> {
        source.validate()?;

        let scopes: Vec<String> = scopes.iter().map(|s| s.as_ref().to_string()).collect();

        let credentials = match source {
            CredentialSource::ApplicationDefault => CredentialsBuilder::default()
                .with_scopes(scopes)
                .build()
                .map_err(|e| {
                    error!(error = %e, "Failed to initialize Application Default Credentials");
                    GoogleError::AuthenticationFailed(format!(
                        "Failed to initialize Application Default Credentials: {e}"
                    ))
                })?,
            CredentialSource::JsonContent(json) => {
                let value: serde_json::Value = serde_json::from_str(&json).map_err(|e| {
                    GoogleError::ConfigurationError(format!("Invalid JSON content: {e}"))
                })?;
                credentials_from_json(value, scopes, "inline JSON")?
            }
            CredentialSource::FilePath(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    GoogleError::ConfigurationError(format!(
                        "Failed to read credentials file '{path}': {e}"
                    ))
                })?;
                let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
                    GoogleError::ConfigurationError(format!(
                        "Failed to parse credentials file '{path}': {e}"
                    ))
                })?;
                credentials_from_json(value, scopes, &path)?
            }
        };

        debug!("Google Cloud credentials loaded");
        Ok(Self { credentials })
    }

    /// Shorthand for [`CredentialSource::from_setting`] followed by [`GoogleAuthClient::new`].
    pub fn from_setting<S: AsRef<str>>(value: &str, scopes: &[S]) -> Result<Self, GoogleError> {
        Self::new(CredentialSource::from_setting(value), scopes)
    }
}

/// Build credentials from a parsed service account or authorized user document
fn credentials_from_json(
    value: serde_json::Value,
    scopes: Vec<String>,
    origin: &str,
) -> Result<Credentials, GoogleError> {
    let kind = value
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("service_account")
        .to_string();

    let built = match kind.as_str() {
        "service_account" => service_account::Builder::new(value)
            .with_access_specifier(service_account::AccessSpecifier::from_scopes(scopes))
            .build(),
        "authorized_user" => user_account::Builder::new(value).with_scopes(scopes).build(),
        other => {
            return Err(GoogleError::ConfigurationError(format!(
                "Unsupported credential type '{other}' in {origin}; \
                 expected 'service_account' or 'authorized_user'"
            )));
        }
    };

    built.map_err(|e| {
        error!(error = %e, origin = %origin, kind = %kind, "Failed to load Google credentials");
        GoogleError::AuthenticationFailed(format!("Failed to load {kind} credentials from {origin}: {e}"))
    })
}

#[async_trait::async_trait]
impl TokenProvider for GoogleAuthClient {
    async fn get_token(&self) -> Result<String, GoogleError> {
        let headers = self
            .credentials
            .headers(Extensions::new())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch access token");
                GoogleError::AuthenticationFailed(format!("Failed to fetch access token: {e}"))
            })?;

        let header_map = match headers {
            CacheableResource::New { data, .. } => data,
            CacheableResource::NotModified => {
                return Err(GoogleError::AuthenticationFailed(
                    "Credentials answered NotModified without a cached token".to_string(),
                ));
            }
        };

        header_map
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string)
            .ok_or_else(|| {
                GoogleError::AuthenticationFailed(
                    "Credentials did not produce a Bearer authorization header".to_string(),
                )
            })
    }
}

/// Fixed-answer token provider for tests.
#[cfg(test)]
pub struct MockTokenProvider {
    pub result: Result<String, String>,
}

#[cfg(test)]
#[async_trait::async_trait]
impl TokenProvider for MockTokenProvider {
    async fn get_token(&self) -> Result<String, GoogleError> {
        self.result
            .clone()
            .map_err(GoogleError::AuthenticationFailed)
    }
}
