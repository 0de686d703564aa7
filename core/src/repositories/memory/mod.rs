//! In-memory implementation of every repository trait.
//!
//! Backs `STORAGE_BACKEND=memory` and the test suites. All tables share one
//! lock so multi-row operations are atomic, and the unique constraints of the
//! MySQL schema are enforced here too.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entities::country::{default_countries, Country};
use crate::domain::entities::login_history::{LoginHistory, NewLoginHistory};
use crate::domain::entities::session::{NewSession, Session, SessionId};
use crate::domain::entities::social_account::{NewSocialAccount, SocialAccount};
use crate::domain::entities::user::{NewUser, User, UserId};
use crate::errors::DomainError;
use crate::repositories::{
    CountryRepository, LoginHistoryRepository, RegistrationRepository, SessionRepository,
    SocialAccountRepository, UserRepository,
};

#[cfg(test)]
mod tests;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    social_accounts: BTreeMap<i64, SocialAccount>,
    sessions: BTreeMap<SessionId, Session>,
    login_history: Vec<LoginHistory>,
    countries: Vec<Country>,
    next_user_id: i64,
    next_social_account_id: i64,
    next_session_id: i64,
}

impl Tables {
    fn check_user_unique(&self, user: &NewUser) -> Result<(), DomainError> {
        for existing in self.users.values() {
            if existing.username == user.username {
                return Err(conflict("users.username"));
            }
            if user.email.is_some() && existing.email == user.email {
                return Err(conflict("users.email"));
            }
            if user.phone_number.is_some() && existing.phone_number == user.phone_number {
                return Err(conflict("users.phone_number"));
            }
        }
        Ok(())
    }

    fn check_social_account_unique(&self, account: &NewSocialAccount) -> Result<(), DomainError> {
        let taken = self.social_accounts.values().any(|existing| {
            existing.provider == account.provider
                && existing.provider_user_id == account.provider_user_id
        });
        if taken {
            return Err(conflict("social_accounts.provider_user_id"));
        }
        Ok(())
    }

    fn check_session_unique(&self, session: &NewSession) -> Result<(), DomainError> {
        for existing in self.sessions.values() {
            if existing.access_token_jti == session.access_token_jti {
                return Err(conflict("sessions.access_token_jti"));
            }
            if existing.refresh_token_jti == session.refresh_token_jti {
                return Err(conflict("sessions.refresh_token_jti"));
            }
        }
        Ok(())
    }

    fn insert_user(&mut self, user: NewUser) -> User {
        self.next_user_id += 1;
        let user = User::from_new(self.next_user_id, user);
        self.users.insert(user.id, user.clone());
        user
    }

    fn insert_social_account(&mut self, user_id: UserId, account: NewSocialAccount) -> SocialAccount {
        self.next_social_account_id += 1;
        let account = SocialAccount::from_new(self.next_social_account_id, user_id, account);
        self.social_accounts.insert(account.id, account.clone());
        account
    }

    fn insert_session(&mut self, user_id: UserId, session: NewSession) -> Session {
        self.next_session_id += 1;
        let session = Session::from_new(self.next_session_id, user_id, session);
        self.sessions.insert(session.id, session.clone());
        session
    }
}

fn conflict(resource: &str) -> DomainError {
    DomainError::Conflict {
        resource: resource.to_string(),
    }
}

/// Shared in-memory database. Cloning yields a handle to the same tables.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Empty store seeded with the default country catalogue
    pub fn new() -> Self {
        Self::with_countries(default_countries())
    }

    pub fn with_countries(countries: Vec<Country>) -> Self {
        let tables = Tables {
            countries,
            ..Tables::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn social_account_count(&self) -> usize {
        self.tables.read().await.social_accounts.len()
    }

    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }

    /// Every history row in insertion order
    pub async fn login_history(&self) -> Vec<LoginHistory> {
        self.tables.read().await.login_history.clone()
    }

    /// Set a user's active flag, for admin tooling and tests
    pub async fn set_user_active(&self, id: UserId, is_active: bool) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("user {}", id),
        })?;
        user.is_active = is_active;
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.phone_number.as_deref() == Some(phone_number))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(&user)?;
        Ok(tables.insert_user(user))
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.get_mut(&id) {
            user.last_login_at = Some(at);
            user.updated_at = at;
        }
        Ok(())
    }
}

#[async_trait]
impl SocialAccountRepository for InMemoryStore {
    async fn find_by_provider(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> Result<Option<SocialAccount>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_accounts
            .values()
            .find(|a| a.provider == provider && a.provider_user_id == provider_user_id)
            .cloned())
    }

    async fn record_use(
        &self,
        id: i64,
        access_token: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if let Some(account) = tables.social_accounts.get_mut(&id) {
            account.last_used_at = at;
            if let Some(token) = access_token {
                account.access_token = Some(token.to_string());
            }
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<SocialAccount>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create_session(
        &self,
        user_id: UserId,
        session: NewSession,
    ) -> Result<Session, DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_session_unique(&session)?;
        Ok(tables.insert_session(user_id, session))
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn find_active_by_refresh_jti(&self, jti: &str) -> Result<Option<Session>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .values()
            .find(|s| s.is_active && s.refresh_token_jti == jti)
            .cloned())
    }

    async fn find_by_access_jti(&self, jti: &str) -> Result<Option<Session>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .values()
            .find(|s| s.access_token_jti == jti)
            .cloned())
    }

    async fn rotate_access_token(
        &self,
        id: SessionId,
        new_access_jti: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .sessions
            .values()
            .any(|s| s.id != id && s.access_token_jti == new_access_jti);
        if taken {
            return Err(conflict("sessions.access_token_jti"));
        }
        let session = tables.sessions.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("session {}", id),
        })?;
        session.access_token_jti = new_access_jti.to_string();
        session.last_activity_at = at;
        Ok(())
    }

    async fn deactivate_by_refresh_jti(&self, jti: &str) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let mut changed = false;
        for session in tables
            .sessions
            .values_mut()
            .filter(|s| s.is_active && s.refresh_token_jti == jti)
        {
            session.is_active = false;
            changed = true;
        }
        Ok(changed)
    }

    async fn deactivate(&self, id: SessionId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if let Some(session) = tables.sessions.get_mut(&id) {
            session.is_active = false;
        }
        Ok(())
    }

    async fn list_active_for_user(&self, user_id: UserId) -> Result<Vec<Session>, DomainError> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<Session> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        Ok(sessions)
    }
}

#[async_trait]
impl LoginHistoryRepository for InMemoryStore {
    async fn append(&self, entry: NewLoginHistory) -> Result<LoginHistory, DomainError> {
        let mut tables = self.tables.write().await;
        let id = tables.login_history.len() as i64 + 1;
        let row = LoginHistory::from_new(id, entry);
        tables.login_history.push(row.clone());
        Ok(row)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<LoginHistory>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .login_history
            .iter()
            .rev()
            .filter(|h| h.user_id == Some(user_id))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CountryRepository for InMemoryStore {
    async fn list_active(&self) -> Result<Vec<Country>, DomainError> {
        let tables = self.tables.read().await;
        let mut countries: Vec<Country> = tables
            .countries
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        countries.sort_by_key(|c| c.display_order);
        Ok(countries)
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn create_user_with_social_account(
        &self,
        user: NewUser,
        account: NewSocialAccount,
    ) -> Result<(User, SocialAccount), DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(&user)?;
        tables.check_social_account_unique(&account)?;

        let user = tables.insert_user(user);
        let account = tables.insert_social_account(user.id, account);
        Ok((user, account))
    }

    async fn create_user_with_session(
        &self,
        user: NewUser,
        session: NewSession,
    ) -> Result<(User, Session), DomainError> {
        let mut tables = self.tables.write().await;
        tables.check_user_unique(&user)?;
        tables.check_session_unique(&session)?;

        let user = tables.insert_user(user);
        let session = tables.insert_session(user.id, session);
        Ok((user, session))
    }
}
