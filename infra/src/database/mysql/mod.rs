//! MySQL repository implementations

pub mod country_repository_impl;
pub mod login_history_repository_impl;
pub mod registration_repository_impl;
pub mod session_repository_impl;
pub mod social_account_repository_impl;
pub mod user_repository_impl;

pub use country_repository_impl::MySqlCountryRepository;
pub use login_history_repository_impl::MySqlLoginHistoryRepository;
pub use registration_repository_impl::MySqlRegistrationRepository;
pub use session_repository_impl::MySqlSessionRepository;
pub use social_account_repository_impl::MySqlSocialAccountRepository;
pub use user_repository_impl::MySqlUserRepository;

use lc_core::errors::DomainError;

/// Map a driver error, turning duplicate-key violations into `Conflict`
/// named after the violated index.
pub(crate) fn map_db_error(context: &str, error: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_unique_violation() {
            let resource = duplicate_key_name(db_err.message()).unwrap_or(context).to_string();
            return DomainError::Conflict { resource };
        }
    }
    tracing::error!("{} failed: {}", context, error);
    DomainError::internal(format!("{}: {}", context, error))
}

/// Column read failure while mapping a row
pub(crate) fn column_error(column: &str, error: sqlx::Error) -> DomainError {
    DomainError::internal(format!("Failed to get {}: {}", column, error))
}

/// Key name from `Duplicate entry 'x' for key 'users.uq_users_email'`
pub(crate) fn duplicate_key_name(message: &str) -> Option<&str> {
    let rest = &message[message.rfind("for key '")? + "for key '".len()..];
    let key = rest.strip_suffix('\'').unwrap_or(rest);
    Some(key.rsplit('.').next().unwrap_or(key))
}
