//! SMS Service Module
//!
//! Verification codes leave the system through an [`SmsRouter`], which picks
//! a transport by the destination number's country and falls back to a
//! global transport when no country route exists.
//!
//! - **Twilio** (`twilio-sms` feature)
//! - **AWS SNS** (`aws-sns` feature)
//! - **Log**: writes the message to the log, for development

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lc_shared::config::{SmsConfig, SmsProviderKind};
use lc_shared::phone::mask_phone_number;
use lc_shared::Language;
use phonenumber::{Mode, PhoneNumber};
use tracing::{debug, error, info, warn};

use crate::InfrastructureError;

pub mod log_provider;
pub mod router;
pub mod templates;

#[cfg(feature = "twilio-sms")]
pub mod twilio;

#[cfg(feature = "aws-sns")]
pub mod aws_sns;

#[cfg(test)]
mod tests;

pub use log_provider::LogSmsProvider;
pub use router::SmsRouter;
pub use templates::verification_message;

#[cfg(feature = "twilio-sms")]
pub use twilio::TwilioSmsProvider;

#[cfg(feature = "aws-sns")]
pub use aws_sns::AwsSnsSmsProvider;

/// Longest body any transport accepts
pub const MAX_MESSAGE_LENGTH: usize = 1600;

/// One SMS transport
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Send `message` to an E.164 number, returning the transport's message id
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError>;

    fn provider_name(&self) -> &str;

    /// Send the localized verification template
    async fn send_verification_code(
        &self,
        phone_number: &str,
        code: &str,
        language: Language,
    ) -> Result<String, InfrastructureError> {
        let message = verification_message(code, language);
        self.send_sms(phone_number, &message).await
    }
}

/// Retry schedule shared by the network transports
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &SmsConfig) -> Self {
        Self {
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Parse and re-format a number as E.164
pub fn validate_phone_number(phone: &str) -> Result<String, InfrastructureError> {
    if !phone.starts_with('+') {
        return Err(InfrastructureError::Sms(
            "Phone number must be in E.164 format (e.g., +886912345678)".to_string(),
        ));
    }

    match phone.parse::<PhoneNumber>() {
        Ok(parsed) => {
            let formatted = parsed.format().mode(Mode::E164).to_string();
            debug!("Validated phone number: {}", mask_phone_number(&formatted));
            Ok(formatted)
        }
        Err(e) => {
            error!("Invalid phone number format: {}", e);
            Err(InfrastructureError::Sms(format!("Invalid phone number format: {}", e)))
        }
    }
}

/// ISO 3166-1 alpha-2 region of an E.164 number, e.g. `TW`
pub fn region_of(phone: &str) -> Option<String> {
    let parsed = phone.parse::<PhoneNumber>().ok()?;
    let id = parsed.country().id()?;
    Some(id.as_ref().to_string())
}

pub(crate) fn check_length(message: &str) -> Result<(), InfrastructureError> {
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(InfrastructureError::Sms(format!(
            "Message exceeds maximum length of {} characters",
            MAX_MESSAGE_LENGTH
        )));
    }
    Ok(())
}

/// Build the transport for one provider kind, or `None` when it cannot be
/// configured (missing credentials or compiled-out feature)
async fn build_provider(
    kind: SmsProviderKind,
    config: &SmsConfig,
) -> Option<Arc<dyn SmsProvider>> {
    match kind {
        SmsProviderKind::Log => Some(Arc::new(LogSmsProvider::new())),
        #[cfg(feature = "twilio-sms")]
        SmsProviderKind::Twilio => match &config.twilio {
            Some(settings) => match TwilioSmsProvider::new(settings.clone(), RetryPolicy::from_config(config)) {
                Ok(provider) => Some(Arc::new(provider)),
                Err(e) => {
                    error!("Failed to initialize Twilio SMS transport: {}", e);
                    None
                }
            },
            None => {
                error!("Twilio SMS transport requested but TWILIO_* credentials are missing");
                None
            }
        },
        #[cfg(feature = "aws-sns")]
        SmsProviderKind::AwsSns => match &config.aws_sns {
            Some(settings) => Some(Arc::new(
                AwsSnsSmsProvider::new(settings.clone(), RetryPolicy::from_config(config)).await,
            )),
            None => {
                error!("AWS SNS transport requested but AWS credentials are missing");
                None
            }
        },
        #[allow(unreachable_patterns)]
        other => {
            warn!("SMS transport {:?} is not compiled into this build", other);
            None
        }
    }
}

/// Build the country router described by `config`.
///
/// Each transport kind is constructed once and shared by every country that
/// uses it. Kinds that cannot be built are left out, so numbers routed to
/// them fail with a routing error instead of reaching a broken transport.
pub async fn build_router(config: &SmsConfig) -> SmsRouter {
    let mut built: HashMap<SmsProviderKind, Option<Arc<dyn SmsProvider>>> = HashMap::new();
    let wanted = config
        .country_providers
        .values()
        .copied()
        .chain(config.fallback_provider);
    for kind in wanted {
        if !built.contains_key(&kind) {
            let provider = build_provider(kind, config).await;
            built.insert(kind, provider);
        }
    }
    let built: HashMap<SmsProviderKind, Arc<dyn SmsProvider>> = built
        .into_iter()
        .filter_map(|(kind, provider)| Some((kind, provider?)))
        .collect();

    let fallback = config.fallback_provider.and_then(|kind| built.get(&kind).cloned());
    let mut router = SmsRouter::new(fallback);
    for (region, kind) in &config.country_providers {
        match built.get(kind) {
            Some(provider) => router = router.with_country(region, provider.clone()),
            None => warn!(region = %region, "No usable SMS transport for region"),
        }
    }

    info!(
        countries = router.country_count(),
        fallback = router.has_fallback(),
        "SMS router ready"
    );
    router
}
