//! Google Cloud provider infrastructure.
//!
//! Shared by every Google-backed service in the crate:
//!
//! - **auth**: credential loading and OAuth2 token acquisition
//! - **error**: error type for Google REST calls
//!
//! # Example
//!
//! ```rust,no_run
//! use voice_detection::core::providers::google::{
//!     GOOGLE_CLOUD_PLATFORM_SCOPE, GoogleAuthClient, GoogleError, TokenProvider,
//! };
//!
//! async fn example() -> Result<(), GoogleError> {
//!     // Empty setting means Application Default Credentials
//!     let client = GoogleAuthClient::from_setting("", &[GOOGLE_CLOUD_PLATFORM_SCOPE])?;
//!     let token = client.get_token().await?;
//!     println!("Authorization: Bearer {token}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;

pub use auth::{CredentialSource, GoogleAuthClient, TokenProvider};
pub use error::GoogleError;

#[cfg(test)]
pub use auth::MockTokenProvider;

/// OAuth2 scope granting access to all Google Cloud APIs.
pub const GOOGLE_CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
