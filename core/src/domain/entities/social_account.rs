//! Link between an external identity-provider account and a local user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// A linked provider account. `(provider, provider_user_id)` is globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialAccount {
    pub id: i64,
    pub user_id: UserId,
    pub provider: String,
    pub provider_user_id: String,
    pub provider_username: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub is_primary: bool,
    pub linked_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

/// Insert payload; the owning user id is supplied by the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSocialAccount {
    pub provider: String,
    pub provider_user_id: String,
    pub provider_username: Option<String>,
    pub access_token: Option<String>,
    pub is_primary: bool,
    pub linked_at: DateTime<Utc>,
}

impl SocialAccount {
    pub fn from_new(id: i64, user_id: UserId, new_account: NewSocialAccount) -> Self {
        Self {
            id,
            user_id,
            provider: new_account.provider,
            provider_user_id: new_account.provider_user_id,
            provider_username: new_account.provider_username,
            access_token: new_account.access_token,
            refresh_token: None,
            is_primary: new_account.is_primary,
            linked_at: new_account.linked_at,
            last_used_at: new_account.linked_at,
        }
    }
}
