//! # Live Commerce Core
//!
//! Domain layer of the Live Commerce backend: users, sessions and login
//! history, the token codec, identity providers, phone verification and the
//! auth flows built on top of them. Persistence, caching and SMS transports
//! are traits here and implemented in `lc_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::{
    AuthRepositories, AuthService, Clock, ExpiringCache, IdentityProvider, LoginContext,
    OAuthCodeExchanger, OAuthSessionService, OtpService, PhoneRegistration, ProviderRegistry,
    SmsDispatcher, SystemClock, TokenCodec,
};
