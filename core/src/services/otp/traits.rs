//! Outbound SMS seam, implemented by the country router in infra

use async_trait::async_trait;
use lc_shared::Language;
use thiserror::Error;

use super::types::SmsReceipt;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmsDispatchError {
    /// Neither a country transport nor a fallback is configured
    #[error("No SMS transport for region {}", region.as_deref().unwrap_or("unknown"))]
    NoRoute { region: Option<String> },

    #[error("{provider} failed to send SMS: {message}")]
    Transport { provider: String, message: String },
}

#[async_trait]
pub trait SmsDispatcher: Send + Sync {
    /// Deliver a localized verification message
    async fn dispatch_verification_code(
        &self,
        phone: &str,
        code: &str,
        language: Language,
    ) -> Result<SmsReceipt, SmsDispatchError>;
}
