//! Token responses returned to clients.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{User, UserId};

pub const BEARER: &str = "bearer";

/// Response of every login and registration path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"bearer"`
    pub token_type: String,
    pub user_id: UserId,
    pub username: String,
    pub display_name: String,
}

impl TokenResponse {
    /// Creates a token response from a signed pair and the user it belongs to
    pub fn from_pair(pair: TokenPair, user: &User) -> Self {
        Self {
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
            token_type: BEARER.to_string(),
            user_id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

/// Response of the refresh operation; the refresh token itself is reused
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

impl RefreshResponse {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: BEARER.to_string(),
        }
    }
}
