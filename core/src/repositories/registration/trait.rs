//! Multi-row provisioning that must commit atomically.

use async_trait::async_trait;

use crate::domain::entities::session::{NewSession, Session};
use crate::domain::entities::social_account::{NewSocialAccount, SocialAccount};
use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;

/// Each operation runs in a single transaction: either every row is
/// committed or none is. Uniqueness violations surface as
/// `DomainError::Conflict`.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// First login through a social provider: user plus primary link
    async fn create_user_with_social_account(
        &self,
        user: NewUser,
        account: NewSocialAccount,
    ) -> Result<(User, SocialAccount), DomainError>;

    /// Phone registration: the user can authenticate as soon as this returns
    async fn create_user_with_session(
        &self,
        user: NewUser,
        session: NewSession,
    ) -> Result<(User, Session), DomainError>;
}
