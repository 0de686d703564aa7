//! Country-aware SMS routing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use lc_core::services::{SmsDispatchError, SmsDispatcher, SmsReceipt};
use lc_shared::phone::mask_phone_number;
use lc_shared::Language;
use tracing::{info, warn};

use super::{region_of, SmsProvider};

/// Picks the transport registered for the destination's region, else the
/// fallback transport
#[derive(Clone, Default)]
pub struct SmsRouter {
    country_providers: HashMap<String, Arc<dyn SmsProvider>>,
    fallback: Option<Arc<dyn SmsProvider>>,
}

impl SmsRouter {
    pub fn new(fallback: Option<Arc<dyn SmsProvider>>) -> Self {
        Self {
            country_providers: HashMap::new(),
            fallback,
        }
    }

    /// Route numbers of `region` (ISO 3166-1 alpha-2) to `provider`
    pub fn with_country(mut self, region: &str, provider: Arc<dyn SmsProvider>) -> Self {
        self.country_providers.insert(region.to_uppercase(), provider);
        self
    }

    pub fn country_count(&self) -> usize {
        self.country_providers.len()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Region of `phone` and the transport that would carry it
    pub fn route(&self, phone: &str) -> (Option<String>, Option<Arc<dyn SmsProvider>>) {
        let region = region_of(phone);
        let provider = region
            .as_deref()
            .and_then(|r| self.country_providers.get(r))
            .or(self.fallback.as_ref())
            .cloned();
        (region, provider)
    }
}

#[async_trait]
impl SmsDispatcher for SmsRouter {
    async fn dispatch_verification_code(
        &self,
        phone: &str,
        code: &str,
        language: Language,
    ) -> Result<SmsReceipt, SmsDispatchError> {
        let (region, provider) = self.route(phone);
        let provider = match provider {
            Some(provider) => provider,
            None => {
                warn!(
                    phone = %mask_phone_number(phone),
                    region = region.as_deref().unwrap_or("unknown"),
                    "No SMS route"
                );
                return Err(SmsDispatchError::NoRoute { region });
            }
        };

        let name = provider.provider_name().to_string();
        let message_id = provider
            .send_verification_code(phone, code, language)
            .await
            .map_err(|e| SmsDispatchError::Transport {
                provider: name.clone(),
                message: e.to_string(),
            })?;

        info!(
            phone = %mask_phone_number(phone),
            provider = %name,
            event = "sms_dispatched",
            "Verification code dispatched"
        );
        Ok(SmsReceipt {
            provider: name,
            message_id,
        })
    }
}
