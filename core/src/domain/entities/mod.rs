//! Domain entities representing core business objects.

pub mod country;
pub mod device;
pub mod login_history;
pub mod session;
pub mod social_account;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use country::{default_countries, Country, LocalizedCountry};
pub use device::{DeviceInfo, ParsedDevice};
pub use login_history::{LoginHistory, LoginStatus, NewLoginHistory};
pub use session::{NewSession, Session, SessionId};
pub use social_account::{NewSocialAccount, SocialAccount};
pub use token::{
    Claims, IssuedToken, SessionGrant, TokenPair, TokenRejection, TokenSubject, TokenType,
};
pub use user::{Gender, NewUser, User, UserId, UserType};
