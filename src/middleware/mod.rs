//! Request middleware
//!
//! - `auth` - API key check for protected routes

pub mod auth;

pub use auth::auth_middleware;
