//! Append-only login history log.

use async_trait::async_trait;

use crate::domain::entities::login_history::{LoginHistory, NewLoginHistory};
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

/// Rows are never updated or deleted. `user_id` carries no foreign key, so
/// history survives the deletion of its user.
#[async_trait]
pub trait LoginHistoryRepository: Send + Sync {
    async fn append(&self, entry: NewLoginHistory) -> Result<LoginHistory, DomainError>;

    /// Most recent first
    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<LoginHistory>, DomainError>;
}
