//! # Live Commerce API
//!
//! actix-web surface over `lc_core`: password, phone and social login,
//! token refresh, session management, phone verification and the OAuth
//! browser flow.

pub mod app;
pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
pub mod views;

pub use app::{configure, create_app};
pub use error::ApiError;
pub use state::AppState;
