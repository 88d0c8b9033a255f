//! Google Cloud Speech-to-Text recognizer.
//!
//! Talks to the synchronous v1 REST method `speech:recognize`, built on top of
//! the shared Google Cloud infrastructure in `core::providers::google`.

pub mod config;
mod provider;

pub use config::{GoogleSpeechAuth, GoogleSpeechConfig};
pub use provider::GoogleSpeechRecognizer;

#[cfg(test)]
mod tests;
