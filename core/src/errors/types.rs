//! Error types for authentication, token handling and input validation

use thiserror::Error;

use crate::domain::entities::token::TokenRejection;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Bad password, OAuth token or other provider credential
    #[error("Invalid {provider} credential")]
    InvalidCredential { provider: String },

    /// OTP missing, expired or mismatched; the cases are deliberately not distinguished
    #[error("Invalid or expired verification code")]
    InvalidVerificationCode,

    #[error("Phone number already registered")]
    PhoneAlreadyRegistered,

    #[error("Please wait {retry_after_seconds} seconds before requesting another code")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("No SMS route available for this phone number")]
    SmsRoutingUnavailable,

    #[error("User not found")]
    UserNotFound,

    #[error("User account is inactive")]
    UserInactive,

    #[error("Unknown identity provider: {provider}")]
    UnknownProvider { provider: String },

    #[error("{provider} login is not implemented")]
    ProviderNotImplemented { provider: String },

    #[error("{provider} login is not configured")]
    ProviderNotConfigured { provider: String },
}

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid token: {reason}")]
    InvalidToken { reason: TokenRejection },

    #[error("Session not found or inactive")]
    SessionNotFound,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid gender. Must be one of: {allowed}")]
    InvalidGender { allowed: String },

    #[error("Invalid phone number: {phone}")]
    InvalidPhoneNumber { phone: String },
}
