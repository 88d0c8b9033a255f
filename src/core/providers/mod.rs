//! Provider infrastructure for external cloud services.
//!
//! # Available Providers
//!
//! - **google**: Google Cloud credentials, tokens and REST error mapping

pub mod google;

pub use google::{
    CredentialSource, GOOGLE_CLOUD_PLATFORM_SCOPE, GoogleAuthClient, GoogleError, TokenProvider,
};
