//! Main OTP service implementation

use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use lc_shared::phone::{is_e164, mask_phone_number, normalize_phone_number};
use lc_shared::Language;
use rand::{rngs::OsRng, RngCore};

use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::cache::ExpiringCache;
use crate::services::clock::{Clock, SystemClock};

use super::config::OtpServiceConfig;
use super::traits::{SmsDispatchError, SmsDispatcher};
use super::types::{CodeCheck, SendCodeResult};

pub fn verification_key(phone: &str) -> String {
    format!("phone_verification:{}", phone)
}

pub fn rate_limit_key(phone: &str) -> String {
    format!("phone_code_rate:{}", phone)
}

/// Verification code workflow for phone registration and login
pub struct OtpService {
    cache: Arc<dyn ExpiringCache>,
    sms: Arc<dyn SmsDispatcher>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl OtpService {
    pub fn new(
        cache: Arc<dyn ExpiringCache>,
        sms: Arc<dyn SmsDispatcher>,
        users: Arc<dyn UserRepository>,
        config: OtpServiceConfig,
    ) -> Self {
        Self::with_clock(cache, sms, users, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        cache: Arc<dyn ExpiringCache>,
        sms: Arc<dyn SmsDispatcher>,
        users: Arc<dyn UserRepository>,
        config: OtpServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            sms,
            users,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Send a verification code to a phone number that is not yet registered
    ///
    /// The registered check runs before the rate check so a refused request
    /// does not start a cooldown.
    pub async fn send_verification_code(
        &self,
        phone: &str,
        language: Language,
    ) -> DomainResult<SendCodeResult> {
        let phone = parse_phone(phone)?;

        if self.users.find_by_phone(&phone).await?.is_some() {
            tracing::info!(phone = %mask_phone_number(&phone), event = "otp_already_registered", "Code requested for registered number");
            return Err(AuthError::PhoneAlreadyRegistered.into());
        }

        self.issue_and_dispatch(&phone, language).await
    }

    /// Send a login code to a number that already belongs to a user.
    ///
    /// Shares the code slot and rate marker with registration codes.
    pub async fn send_login_code(&self, phone: &str, language: Language) -> DomainResult<SendCodeResult> {
        let phone = parse_phone(phone)?;

        if self.users.find_by_phone(&phone).await?.is_none() {
            tracing::info!(phone = %mask_phone_number(&phone), event = "otp_unknown_number", "Login code requested for unregistered number");
            return Err(AuthError::UserNotFound.into());
        }

        self.issue_and_dispatch(&phone, language).await
    }

    /// Rate check, generate, store code, set rate marker, dispatch
    async fn issue_and_dispatch(&self, phone: &str, language: Language) -> DomainResult<SendCodeResult> {
        let masked = mask_phone_number(phone);

        if let Some(marker) = self.cache.get(&rate_limit_key(phone)).await? {
            let retry_after_seconds = self.retry_after(&marker);
            tracing::warn!(
                phone = %masked,
                retry_after_seconds,
                event = "rate_limit_exceeded",
                "Verification code request rate limit exceeded"
            );
            return Err(AuthError::RateLimitExceeded { retry_after_seconds }.into());
        }

        let code = generate_code();
        tracing::info!(phone = %masked, event = "otp_generated", "Generated new verification code");

        self.cache
            .set_with_expiry(&verification_key(phone), &code, self.config.code_ttl_seconds)
            .await?;
        let issued_at = self.clock.now().timestamp().to_string();
        self.cache
            .set_with_expiry(
                &rate_limit_key(phone),
                &issued_at,
                self.config.resend_cooldown_seconds,
            )
            .await?;

        let receipt = self
            .sms
            .dispatch_verification_code(phone, &code, language)
            .await
            .map_err(|e| {
                tracing::error!(phone = %masked, error = %e, event = "otp_dispatch_failed", "Failed to send verification code");
                match e {
                    SmsDispatchError::NoRoute { .. } => DomainError::from(AuthError::SmsRoutingUnavailable),
                    SmsDispatchError::Transport { provider, message } => {
                        DomainError::upstream(provider, message)
                    }
                }
            })?;

        tracing::info!(
            phone = %masked,
            provider = %receipt.provider,
            message_id = %receipt.message_id,
            event = "otp_sent",
            "Verification code sent"
        );

        Ok(SendCodeResult {
            expires_in: self.config.code_ttl_seconds,
            receipt,
        })
    }

    /// Pre-check used by clients before submitting registration; does not consume the code
    pub async fn verify_code(&self, phone: &str, code: &str) -> DomainResult<()> {
        let phone = normalize_phone_number(phone);
        if self.check_code(&phone, code).await? {
            Ok(())
        } else {
            tracing::info!(phone = %mask_phone_number(&phone), event = "otp_verify_failed", "Verification code rejected");
            Err(AuthError::InvalidVerificationCode.into())
        }
    }

    /// Missing and mismatched codes both yield `false`
    pub async fn check_code(&self, phone: &str, code: &str) -> DomainResult<bool> {
        Ok(self.compare_code(phone, code).await? == CodeCheck::Matched)
    }

    pub async fn compare_code(&self, phone: &str, code: &str) -> DomainResult<CodeCheck> {
        let stored = self.cache.get(&verification_key(phone)).await?;
        Ok(match stored {
            Some(stored) if constant_time_eq(stored.as_bytes(), code.as_bytes()) => CodeCheck::Matched,
            Some(_) => CodeCheck::Mismatched,
            None => CodeCheck::Missing,
        })
    }

    /// Delete the code after it has been used for registration or login
    pub async fn consume_code(&self, phone: &str) -> DomainResult<()> {
        let phone = normalize_phone_number(phone);
        self.cache.delete(&verification_key(&phone)).await?;
        Ok(())
    }

    fn retry_after(&self, marker: &str) -> u64 {
        let cooldown = self.config.resend_cooldown_seconds as i64;
        let elapsed = marker
            .parse::<i64>()
            .map(|issued_at| self.clock.now().timestamp() - issued_at)
            .unwrap_or(0);
        (cooldown - elapsed).clamp(1, cooldown.max(1)) as u64
    }
}

/// Normalize and require E.164
pub(crate) fn parse_phone(phone: &str) -> DomainResult<String> {
    let normalized = normalize_phone_number(phone);
    if !is_e164(&normalized) {
        return Err(ValidationError::InvalidPhoneNumber {
            phone: mask_phone_number(phone),
        }
        .into());
    }
    Ok(normalized)
}

/// Uniform 6-digit code from the OS CSPRNG
fn generate_code() -> String {
    let num = OsRng.next_u32() % 1_000_000;
    format!("{:06}", num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_parse_phone_requires_e164() {
        assert_eq!(parse_phone("+886 912-345-678").unwrap(), "+886912345678");
        assert!(parse_phone("0912345678").is_err());
        assert!(parse_phone("+12").is_err());
    }
}
