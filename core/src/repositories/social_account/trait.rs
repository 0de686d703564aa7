//! Persistence for provider account links.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::social_account::SocialAccount;
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

/// Links are created together with their user through
/// [`RegistrationRepository`](crate::repositories::RegistrationRepository);
/// this trait only reads and touches existing rows.
#[async_trait]
pub trait SocialAccountRepository: Send + Sync {
    async fn find_by_provider(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<SocialAccount>, DomainError>;

    /// Refresh the cached provider token and bump `last_used_at`
    async fn record_use(
        &self,
        id: i64,
        access_token: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<SocialAccount>, DomainError>;
}
