//! Error types shared across the HTTP surface and the decode boundary

pub mod app_error;
pub mod audio_error;
pub mod auth_error;
