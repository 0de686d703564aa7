//! JWT signing and verification

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{
    Claims, IssuedToken, SessionGrant, TokenPair, TokenRejection, TokenSubject, TokenType,
};
use crate::errors::{DomainError, TokenError};
use crate::services::clock::{Clock, SystemClock};

use super::config::TokenServiceConfig;

/// Stateless HS256 codec. Expiry is checked against the injected clock.
pub struct TokenCodec {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(config: TokenServiceConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 0;
        // exp is compared against `clock` in `decode_token`
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
            clock,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Reserve fresh jtis and expiry instants for a new session.
    ///
    /// Instants are truncated to whole seconds so that a session's
    /// `expires_at` equals its refresh token's `exp` exactly.
    pub fn mint_grant(&self) -> SessionGrant {
        let issued_at = whole_second(self.clock.now());
        SessionGrant {
            access_jti: new_jti(),
            refresh_jti: new_jti(),
            issued_at,
            access_expires_at: issued_at + Duration::minutes(self.config.access_token_expiry_minutes),
            refresh_expires_at: issued_at + Duration::days(self.config.refresh_token_expiry_days),
        }
    }

    /// Sign both tokens of a previously minted grant
    pub fn sign_grant(
        &self,
        subject: &TokenSubject,
        grant: &SessionGrant,
    ) -> Result<TokenPair, DomainError> {
        let access = self.sign(
            subject,
            TokenType::Access,
            &grant.access_jti,
            grant.issued_at,
            grant.access_expires_at,
        )?;
        let refresh = self.sign(
            subject,
            TokenType::Refresh,
            &grant.refresh_jti,
            grant.issued_at,
            grant.refresh_expires_at,
        )?;
        Ok(TokenPair { access, refresh })
    }

    pub fn issue_access_token(
        &self,
        subject: &TokenSubject,
        ttl_minutes: i64,
    ) -> Result<IssuedToken, DomainError> {
        let issued_at = whole_second(self.clock.now());
        self.sign(
            subject,
            TokenType::Access,
            &new_jti(),
            issued_at,
            issued_at + Duration::minutes(ttl_minutes),
        )
    }

    /// Access token with the configured lifetime
    pub fn issue_default_access_token(&self, subject: &TokenSubject) -> Result<IssuedToken, DomainError> {
        self.issue_access_token(subject, self.config.access_token_expiry_minutes)
    }

    pub fn issue_refresh_token(
        &self,
        subject: &TokenSubject,
        ttl_days: i64,
    ) -> Result<IssuedToken, DomainError> {
        let issued_at = whole_second(self.clock.now());
        self.sign(
            subject,
            TokenType::Refresh,
            &new_jti(),
            issued_at,
            issued_at + Duration::days(ttl_days),
        )
    }

    /// Verify signature, issuer, audience and expiry.
    ///
    /// As with `jsonwebtoken`'s own check, a token stays valid through the
    /// second named by its `exp`.
    pub fn decode_token(&self, token: &str) -> Result<Claims, TokenRejection> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| rejection_for(e.kind()))?;

        let claims = data.claims;
        if claims.exp < self.clock.now().timestamp() {
            return Err(TokenRejection::Expired);
        }
        if claims.user_id().is_none() {
            return Err(TokenRejection::Malformed);
        }
        Ok(claims)
    }

    pub fn decode_expecting(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, TokenRejection> {
        let claims = self.decode_token(token)?;
        if claims.token_type != expected {
            return Err(TokenRejection::WrongType);
        }
        Ok(claims)
    }

    fn sign(
        &self,
        subject: &TokenSubject,
        token_type: TokenType,
        jti: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, DomainError> {
        let claims = Claims {
            sub: subject.user_id.to_string(),
            username: subject.username.clone(),
            token_type,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: jti.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, token_type = %token_type, "Failed to sign token");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })?;

        Ok(IssuedToken {
            token,
            jti: jti.to_string(),
            expires_at,
        })
    }
}

/// 128-bit random identifier
fn new_jti() -> String {
    Uuid::new_v4().to_string()
}

fn whole_second(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}

fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidSignature => TokenRejection::InvalidSignature,
        ErrorKind::ImmatureSignature => TokenRejection::NotYetValid,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::InvalidSubject => {
            TokenRejection::InvalidClaims
        }
        _ => TokenRejection::Malformed,
    }
}
