use std::sync::Arc;

use crate::repositories::{
    LoginHistoryRepository, RegistrationRepository, SessionRepository, SocialAccountRepository,
    UserRepository,
};

/// Persistence the auth flows depend on
#[derive(Clone)]
pub struct AuthRepositories {
    pub users: Arc<dyn UserRepository>,
    pub social_accounts: Arc<dyn SocialAccountRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub login_history: Arc<dyn LoginHistoryRepository>,
    pub registration: Arc<dyn RegistrationRepository>,
}

impl AuthRepositories {
    /// Every repository served by one store (e.g. `InMemoryStore`)
    pub fn from_store<S>(store: S) -> Self
    where
        S: UserRepository
            + SocialAccountRepository
            + SessionRepository
            + LoginHistoryRepository
            + RegistrationRepository
            + Clone
            + 'static,
    {
        Self {
            users: Arc::new(store.clone()),
            social_accounts: Arc::new(store.clone()),
            sessions: Arc::new(store.clone()),
            login_history: Arc::new(store.clone()),
            registration: Arc::new(store),
        }
    }
}
