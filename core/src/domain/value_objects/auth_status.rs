//! Result of authenticating a bearer access token.

use std::fmt;

use crate::domain::entities::session::Session;
use crate::domain::entities::token::TokenRejection;
use crate::domain::entities::user::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user: User,
    pub session: Session,
}

/// Why a request is not authenticated. All variants map to the same 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    InvalidToken(TokenRejection),
    /// No active session holds this access jti (logged out or superseded by a refresh)
    SessionRevoked,
    SessionExpired,
    /// User deleted or deactivated
    UserUnavailable,
}

impl fmt::Display for UnauthenticatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnauthenticatedReason::InvalidToken(rejection) => write!(f, "{}", rejection),
            UnauthenticatedReason::SessionRevoked => f.write_str("session revoked"),
            UnauthenticatedReason::SessionExpired => f.write_str("session expired"),
            UnauthenticatedReason::UserUnavailable => f.write_str("user unavailable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated(Box<AuthenticatedUser>),
    Unauthenticated(UnauthenticatedReason),
}

impl AuthStatus {
    pub fn authenticated(user: User, session: Session) -> Self {
        AuthStatus::Authenticated(Box::new(AuthenticatedUser { user, session }))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated(_))
    }
}
