//! Session store: the authority for revocation and refresh rotation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::session::{NewSession, Session, SessionId};
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

/// Repository trait for Session persistence
///
/// Both jti columns are globally unique. Sessions are never deleted; they
/// only move from active to inactive.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new active session. Many concurrent sessions per user are allowed.
    async fn create_session(
        &self,
        user_id: UserId,
        session: NewSession,
    ) -> Result<Session, DomainError>;

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, DomainError>;

    /// Only matches rows with `is_active = true`
    async fn find_active_by_refresh_jti(&self, jti: &str) -> Result<Option<Session>, DomainError>;

    /// Matches active and inactive rows; callers check `is_active`
    async fn find_by_access_jti(&self, jti: &str) -> Result<Option<Session>, DomainError>;

    /// Replace the access jti and bump `last_activity_at` in one statement.
    /// Refresh jti and expiry are untouched.
    async fn rotate_access_token(
        &self,
        id: SessionId,
        new_access_jti: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Idempotent. Returns whether an active row was switched off.
    async fn deactivate_by_refresh_jti(&self, jti: &str) -> Result<bool, DomainError>;

    async fn deactivate(&self, id: SessionId) -> Result<(), DomainError>;

    /// Active sessions, most recent activity first
    async fn list_active_for_user(&self, user_id: UserId) -> Result<Vec<Session>, DomainError>;
}
