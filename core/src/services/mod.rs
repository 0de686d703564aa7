//! Business services containing domain logic and use cases.

pub mod auth;
pub mod cache;
pub mod clock;
pub mod identity;
pub mod oauth;
pub mod otp;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthRepositories, AuthService, LoginContext, PhoneRegistration};
pub use cache::{ExpiringCache, InMemoryCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::{
    IdentityProvider, PasswordIdentityProvider, PhoneIdentityProvider, ProviderRegistry,
    UnsupportedIdentityProvider,
};
pub use oauth::{OAuthCodeExchanger, OAuthSessionService, OAuthSessionStart};
pub use otp::{OtpService, OtpServiceConfig, SendCodeResult, SmsDispatchError, SmsDispatcher, SmsReceipt};
pub use token::{hash_password, verify_password, TokenCodec, TokenServiceConfig};
