//! Repository interfaces for persistence, plus an in-memory implementation.

pub mod country;
pub mod login_history;
pub mod memory;
pub mod registration;
pub mod session;
pub mod social_account;
pub mod user;

pub use country::CountryRepository;
pub use login_history::LoginHistoryRepository;
pub use memory::InMemoryStore;
pub use registration::RegistrationRepository;
pub use session::SessionRepository;
pub use social_account::SocialAccountRepository;
pub use user::UserRepository;
