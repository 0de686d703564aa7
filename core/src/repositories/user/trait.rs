//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::user::{NewUser, User, UserId};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Username, email and phone number are unique columns. Implementations must
/// report a violated uniqueness constraint as `DomainError::Conflict` so that
/// callers racing on the same phone number can tell it apart from a driver
/// failure.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Look up by E.164 phone number
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError>;

    /// Insert a standalone user (no linked session or social account)
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Bump `last_login_at` (and `updated_at`)
    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), DomainError>;
}
