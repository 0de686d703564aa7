//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and migrations
//! - One repository per core repository trait
//! - Transactional provisioning for registration

pub mod connection;
pub mod mysql;


use std::sync::Arc;

use lc_core::repositories::CountryRepository;
use lc_core::services::AuthRepositories;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlCountryRepository, MySqlLoginHistoryRepository, MySqlRegistrationRepository,
    MySqlSessionRepository, MySqlSocialAccountRepository, MySqlUserRepository,
};

impl DatabasePool {
    pub fn auth_repositories(&self) -> AuthRepositories {
        let pool = self.get_pool();
        AuthRepositories {
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            social_accounts: Arc::new(MySqlSocialAccountRepository::new(pool.clone())),
            sessions: Arc::new(MySqlSessionRepository::new(pool.clone())),
            login_history: Arc::new(MySqlLoginHistoryRepository::new(pool.clone())),
            registration: Arc::new(MySqlRegistrationRepository::new(pool.clone())),
        }
    }

    pub fn country_repository(&self) -> Arc<dyn CountryRepository> {
        Arc::new(MySqlCountryRepository::new(self.get_pool().clone()))
    }
}
