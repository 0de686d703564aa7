use chrono::{DateTime, NaiveDate, Utc};
use lc_core::domain::{DeviceInfo, LoginHistory, LoginStatus, Session, SessionId, User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    #[serde(default)]
    pub device_info: Option<DeviceInfo>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// Logout never fails, so every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Body of `POST /auth/social/{provider}`; Google expects an ID token here
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SocialLoginRequest {
    #[validate(length(min = 1, message = "access_token is required"))]
    pub access_token: String,

    #[serde(default)]
    pub device_info: Option<DeviceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginHistoryQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

impl LoginHistoryQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

/// Profile returned by `GET /auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar_url: Option<String>,
    pub user_type: String,
    pub is_verified: bool,
    pub preferred_language: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub session_id: SessionId,
}

impl UserProfile {
    pub fn new(user: User, session_id: SessionId) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone_number: user.phone_number,
            display_name: user.display_name,
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            gender: user.gender.map(|g| g.as_str().to_string()),
            date_of_birth: user.date_of_birth,
            avatar_url: user.avatar_url,
            user_type: user.user_type.as_str().to_string(),
            is_verified: user.is_verified,
            preferred_language: user.preferred_language,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
            session_id,
        }
    }
}

/// Active session as listed to its owner; jtis stay server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: SessionId,
    pub device_type: String,
    pub device_name: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True for the session that made this request
    pub is_current: bool,
}

impl SessionResponse {
    pub fn new(session: Session, current: SessionId) -> Self {
        Self {
            is_current: session.id == current,
            id: session.id,
            device_type: session.device_type,
            device_name: session.device_name,
            ip_address: session.ip_address,
            user_agent: session.user_agent,
            created_at: session.created_at,
            last_activity_at: session.last_activity_at,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginHistoryEntry {
    pub id: i64,
    pub login_method: String,
    pub status: LoginStatus,
    pub ip_address: Option<String>,
    pub device_type: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LoginHistory> for LoginHistoryEntry {
    fn from(entry: LoginHistory) -> Self {
        Self {
            id: entry.id,
            login_method: entry.login_method,
            status: entry.status,
            ip_address: entry.ip_address,
            device_type: entry.device_type,
            failure_reason: entry.failure_reason,
            created_at: entry.created_at,
        }
    }
}
