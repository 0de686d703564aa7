//! Polling record handed from the OAuth redirect callback to the client.

use serde::{Deserialize, Serialize};

/// Stored as JSON under `{provider}_session:{state}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OAuthSessionState {
    Pending,
    /// `access_token` is the provider token (or Google ID token), which the
    /// client then exchanges through the social login endpoint
    Completed { access_token: String },
    Failed { error: String },
}

impl OAuthSessionState {
    /// Terminal records are returned once and then deleted
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OAuthSessionState::Pending)
    }
}
