//! Transactional provisioning for first-time social login and phone
//! registration.

use async_trait::async_trait;
use sqlx::MySqlPool;

use lc_core::domain::entities::session::{NewSession, Session};
use lc_core::domain::entities::social_account::{NewSocialAccount, SocialAccount};
use lc_core::domain::entities::user::{NewUser, User};
use lc_core::errors::DomainError;
use lc_core::repositories::RegistrationRepository;

use super::map_db_error;
use super::session_repository_impl::insert_session;
use super::social_account_repository_impl::insert_social_account;
use super::user_repository_impl::insert_user;

pub struct MySqlRegistrationRepository {
    pool: MySqlPool,
}

impl MySqlRegistrationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for MySqlRegistrationRepository {
    async fn create_user_with_social_account(
        &self,
        user: NewUser,
        account: NewSocialAccount,
    ) -> Result<(User, SocialAccount), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("begin transaction", e))?;

        // Dropping `tx` on an early return rolls the insert back
        let user = insert_user(&mut *tx, user).await?;
        let account = insert_social_account(&mut *tx, user.id, account).await?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("commit social registration", e))?;
        Ok((user, account))
    }

    async fn create_user_with_session(
        &self,
        user: NewUser,
        session: NewSession,
    ) -> Result<(User, Session), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("begin transaction", e))?;

        let user = insert_user(&mut *tx, user).await?;
        let session = insert_session(&mut *tx, user.id, session).await?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("commit phone registration", e))?;
        Ok((user, session))
    }
}
