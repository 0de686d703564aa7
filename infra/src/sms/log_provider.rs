//! Development transport that logs messages instead of sending them

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lc_shared::phone::mask_phone_number;
use tracing::info;

use super::{check_length, validate_phone_number, SmsProvider};
use crate::InfrastructureError;

#[derive(Debug, Default)]
pub struct LogSmsProvider {
    sent: AtomicU64,
}

impl LogSmsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages "sent" so far
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SmsProvider for LogSmsProvider {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let phone = validate_phone_number(phone_number)?;
        check_length(message)?;

        let sequence = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            phone = %mask_phone_number(&phone),
            event = "sms_logged",
            "SMS not sent (log transport): {}",
            message
        );
        Ok(format!("log-{}", sequence))
    }

    fn provider_name(&self) -> &str {
        "log"
    }
}
