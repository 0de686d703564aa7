//! Auth orchestration: login, refresh, logout, registration and
//! access-token authentication over the session store.

mod context;
mod repositories;
mod service;

#[cfg(test)]
mod tests;

pub use context::{LoginContext, PhoneRegistration};
pub use repositories::AuthRepositories;
pub use service::AuthService;
