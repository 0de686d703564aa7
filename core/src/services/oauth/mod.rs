//! Browser redirect flow for OAuth providers.
//!
//! The app opens `authorize_url`, the provider redirects to our callback, and
//! the callback leaves a short-lived polling record that the app reads once.

mod service;
mod traits;

pub use service::{session_key, OAuthSessionService, OAuthSessionStart};
pub use traits::OAuthCodeExchanger;
