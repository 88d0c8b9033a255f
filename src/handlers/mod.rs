//! HTTP request handlers
//!
//! - `api` - service info and health check
//! - `detection` - AI-voice detection endpoints

pub mod api;
pub mod detection;

pub use detection::{predict_handler, voice_detection_handler};
