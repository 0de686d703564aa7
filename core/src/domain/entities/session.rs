//! Server-side session bound to one issued access/refresh token pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

pub type SessionId = i64;

/// One login on one device.
///
/// `active -> inactive` is the only transition; rows are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    #[serde(skip_serializing)]
    pub access_token_jti: String,
    #[serde(skip_serializing)]
    pub refresh_token_jti: String,
    pub device_type: String,
    pub device_name: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_active: bool,
    /// Tied to the refresh token lifetime
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    pub fn from_new(id: SessionId, user_id: UserId, new_session: NewSession) -> Self {
        Self {
            id,
            user_id,
            access_token_jti: new_session.access_token_jti,
            refresh_token_jti: new_session.refresh_token_jti,
            device_type: new_session.device_type,
            device_name: new_session.device_name,
            ip_address: new_session.ip_address,
            user_agent: new_session.user_agent,
            is_active: true,
            expires_at: new_session.expires_at,
            created_at: new_session.created_at,
            last_activity_at: new_session.created_at,
        }
    }

    /// Expiry is inclusive: a session whose `expires_at` equals `now` is expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }
}

/// Insert payload for a session; the owner is passed separately so the row
/// can be built before a new user's id is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub access_token_jti: String,
    pub refresh_token_jti: String,
    pub device_type: String,
    pub device_name: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring_at(expires_at: DateTime<Utc>) -> Session {
        Session::from_new(
            1,
            10,
            NewSession {
                access_token_jti: "a".to_string(),
                refresh_token_jti: "r".to_string(),
                device_type: "unknown".to_string(),
                device_name: None,
                ip_address: None,
                user_agent: None,
                expires_at,
                created_at: expires_at - Duration::days(7),
            },
        )
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let expires_at = Utc::now();
        let session = session_expiring_at(expires_at);

        assert!(!session.is_expired_at(expires_at - Duration::seconds(1)));
        assert!(session.is_expired_at(expires_at));
        assert!(session.is_expired_at(expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_inactive_session_is_not_usable() {
        let now = Utc::now();
        let mut session = session_expiring_at(now + Duration::days(1));
        assert!(session.is_usable_at(now));

        session.is_active = false;
        assert!(!session.is_usable_at(now));
    }

    #[test]
    fn test_last_activity_starts_at_creation() {
        let session = session_expiring_at(Utc::now());
        assert_eq!(session.last_activity_at, session.created_at);
        assert!(session.is_active);
    }
}
