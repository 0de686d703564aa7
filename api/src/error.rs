//! Domain error to HTTP response mapping.
//!
//! Every handler returns `Result<_, ApiError>`; the body is always the shared
//! `ErrorResponse` shape. Phone OTP failures answer 400 rather than 401 so
//! existing mobile clients keep working.

use std::collections::HashMap;
use std::fmt;

use actix_web::http::{header, StatusCode};
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use lc_core::errors::{AuthError, DomainError, TokenError, ValidationError};
use lc_shared::ErrorResponse;
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug)]
pub struct ApiError {
    error: DomainError,
    fields: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(error: DomainError) -> Self {
        Self { error, fields: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(DomainError::Validation {
            message: message.into(),
        })
    }

    pub fn domain_error(&self) -> &DomainError {
        &self.error
    }

    /// Machine-readable code placed in `ErrorResponse::error`
    pub fn code(&self) -> &'static str {
        match &self.error {
            DomainError::Validation { .. } => "validation_error",
            DomainError::NotFound { .. } => "not_found",
            DomainError::Conflict { .. } => "conflict",
            DomainError::Forbidden { .. } => "forbidden",
            DomainError::Unauthorized => "unauthorized",
            DomainError::Upstream { .. } => "upstream_unavailable",
            DomainError::Internal { .. } => "internal_error",
            DomainError::Auth(auth) => match auth {
                AuthError::InvalidCredential { .. } => "invalid_credential",
                AuthError::InvalidVerificationCode => "invalid_verification_code",
                AuthError::PhoneAlreadyRegistered => "already_registered",
                AuthError::RateLimitExceeded { .. } => "rate_limited",
                AuthError::SmsRoutingUnavailable => "sms_routing_unavailable",
                AuthError::UserNotFound => "user_not_found",
                AuthError::UserInactive => "user_inactive",
                AuthError::UnknownProvider { .. } => "unknown_provider",
                AuthError::ProviderNotImplemented { .. } => "not_implemented",
                AuthError::ProviderNotConfigured { .. } => "provider_not_configured",
            },
            DomainError::Token(token) => match token {
                TokenError::InvalidToken { .. } => "invalid_token",
                TokenError::SessionNotFound => "session_not_found",
                TokenError::RefreshTokenExpired => "refresh_token_expired",
                TokenError::TokenGenerationFailed => "internal_error",
            },
            DomainError::ValidationErr(validation) => match validation {
                ValidationError::RequiredField { .. } => "required_field",
                ValidationError::InvalidFormat { .. } => "invalid_format",
                ValidationError::InvalidGender { .. } => "invalid_gender",
                ValidationError::InvalidPhoneNumber { .. } => "invalid_phone_number",
            },
        }
    }

    /// Client-facing message. Storage failures never leak their detail;
    /// upstream failures name the provider.
    pub fn message(&self) -> String {
        match &self.error {
            DomainError::Internal { .. } | DomainError::Token(TokenError::TokenGenerationFailed) => {
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.error {
            DomainError::Validation { .. } | DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict { .. } => StatusCode::CONFLICT,
            DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
            DomainError::Token(TokenError::TokenGenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
            DomainError::Unauthorized | DomainError::Token(_) => StatusCode::UNAUTHORIZED,
            DomainError::Upstream { .. } | DomainError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            DomainError::Auth(auth) => match auth {
                AuthError::InvalidCredential { .. } => StatusCode::UNAUTHORIZED,
                AuthError::InvalidVerificationCode
                | AuthError::PhoneAlreadyRegistered
                | AuthError::UnknownProvider { .. } => StatusCode::BAD_REQUEST,
                AuthError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::UserInactive => StatusCode::FORBIDDEN,
                AuthError::ProviderNotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
                AuthError::SmsRoutingUnavailable | AuthError::ProviderNotConfigured { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.error);
        } else {
            log::info!("Request rejected ({}): {}", status.as_u16(), self.error);
        }

        let mut body = ErrorResponse::new(self.code(), self.message());
        if let Some(fields) = &self.fields {
            body = body.with_detail("fields", serde_json::json!(fields));
        }

        let mut builder = HttpResponse::build(status);
        if let DomainError::Auth(AuthError::RateLimitExceeded { retry_after_seconds }) = &self.error {
            body = body.with_detail("retry_after", serde_json::json!(retry_after_seconds));
            builder.insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()));
        }
        builder.json(body)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::new(error)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        Self::new(error.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        Self::new(error.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::new(error.into())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: HashMap<String, Vec<String>> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        let mut names: Vec<&str> = fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        let message = format!("Invalid request data: {}", names.join(", "));

        Self {
            error: DomainError::Validation { message },
            fields: Some(fields),
        }
    }
}

/// Run `validator` checks on a request body
pub fn validate<T: validator::Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(ApiError::from)
}

/// Malformed JSON bodies, query strings and path segments answer in the
/// standard error shape
pub fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request(format!("Invalid JSON body: {}", err)).into()
}

pub fn query_error_handler(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request(format!("Invalid query string: {}", err)).into()
}

pub fn path_error_handler(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request(format!("Invalid path parameter: {}", err)).into()
}
