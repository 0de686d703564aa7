//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod auth_status;
pub mod identity;
pub mod oauth_session;

// Re-export commonly used types
pub use auth_response::{RefreshResponse, TokenResponse};
pub use auth_status::{AuthStatus, AuthenticatedUser, UnauthenticatedReason};
pub use identity::{Credential, ExternalIdentity, ProviderKind};
pub use oauth_session::OAuthSessionState;
