//! Append-only audit trail of authentication attempts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Outcome of an authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    Success,
    Failed,
    /// Credentials were valid but the account is inactive
    Blocked,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Success => "success",
            LoginStatus::Failed => "failed",
            LoginStatus::Blocked => "blocked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(LoginStatus::Success),
            "failed" => Some(LoginStatus::Failed),
            "blocked" => Some(LoginStatus::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored history row. `user_id` is a soft reference with no foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginHistory {
    pub id: i64,
    pub user_id: Option<UserId>,
    pub login_method: String,
    pub provider_user_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub status: LoginStatus,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoginHistory {
    pub user_id: Option<UserId>,
    pub login_method: String,
    pub provider_user_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub status: LoginStatus,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LoginHistory {
    pub fn from_new(id: i64, entry: NewLoginHistory) -> Self {
        Self {
            id,
            user_id: entry.user_id,
            login_method: entry.login_method,
            provider_user_id: entry.provider_user_id,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            device_type: entry.device_type,
            status: entry.status,
            failure_reason: entry.failure_reason,
            created_at: entry.created_at,
        }
    }
}
