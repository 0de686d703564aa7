//! Token entities for JWT-based session authentication.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Token type tag carried in every JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
///
/// Every field is required at decode time; a token missing any of them is
/// rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, decimal string)
    pub sub: String,

    /// Username at the time of issuance
    pub username: String,

    /// Access or refresh
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, the revocation handle used by the session store
    pub jti: String,
}

impl Claims {
    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Who a token is issued to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: UserId,
    pub username: String,
}

impl TokenSubject {
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// Token identifiers and expiry instants reserved for one session, before
/// any token string is signed.
///
/// Minting a grant first lets the session row be written in the same
/// transaction as a brand new user, whose id is only known after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub access_jti: String,
    pub refresh_jti: String,
    pub issued_at: DateTime<Utc>,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// A signed token together with the identifiers it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

/// Signed access + refresh pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Why a token failed to decode
///
/// Callers collapse all of these into "unauthenticated"; the distinction is
/// kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    InvalidSignature,
    Malformed,
    WrongType,
    NotYetValid,
    InvalidClaims,
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TokenRejection::Expired => "token expired",
            TokenRejection::InvalidSignature => "invalid signature",
            TokenRejection::Malformed => "malformed token",
            TokenRejection::WrongType => "wrong token type",
            TokenRejection::NotYetValid => "token not yet valid",
            TokenRejection::InvalidClaims => "invalid issuer or audience",
        };
        f.write_str(reason)
    }
}
