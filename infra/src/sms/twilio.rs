//! Twilio SMS transport
//!
//! Retries transient failures with exponential backoff; client errors such
//! as an invalid destination are returned immediately.

use async_trait::async_trait;
use lc_shared::config::TwilioSettings;
use lc_shared::phone::mask_phone_number;
use tracing::{debug, error, info, warn};
use twilio::{Client, OutboundMessage};

use super::{check_length, validate_phone_number, RetryPolicy, SmsProvider};
use crate::InfrastructureError;

pub struct TwilioSmsProvider {
    client: Client,
    from_number: String,
    retry: RetryPolicy,
}

impl TwilioSmsProvider {
    pub fn new(settings: TwilioSettings, retry: RetryPolicy) -> Result<Self, InfrastructureError> {
        if !settings.from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        let client = Client::new(&settings.account_sid, &settings.auth_token);
        info!(
            "Twilio SMS transport initialized with from number: {}",
            mask_phone_number(&settings.from_number)
        );

        Ok(Self {
            client,
            from_number: settings.from_number,
            retry,
        })
    }

    async fn send_with_retry(&self, to: &str, message: &str) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = self.retry.retry_delay;

        loop {
            attempts += 1;
            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                self.retry.max_retries,
                mask_phone_number(to)
            );

            let outbound = OutboundMessage::new(&self.from_number, to, message);
            match self.client.send_message(outbound).await {
                Ok(response) => {
                    info!(
                        "SMS sent to {} with SID: {}",
                        mask_phone_number(to),
                        response.sid
                    );
                    return Ok(response.sid);
                }
                Err(e) => {
                    error!(
                        "Failed to send SMS (attempt {}/{}): {}",
                        attempts, self.retry.max_retries, e
                    );

                    if attempts >= self.retry.max_retries {
                        return Err(InfrastructureError::Sms(format!(
                            "Twilio gave up after {} attempts: {}",
                            attempts, e
                        )));
                    }

                    let error_msg = e.to_string();
                    if is_client_error(&error_msg) {
                        return Err(InfrastructureError::Sms(format!("Invalid request: {}", e)));
                    }
                    warn!("Retrying Twilio send after {:?}", delay);

                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

/// 4xx responses other than throttling are not worth retrying
pub(crate) fn is_client_error(error_msg: &str) -> bool {
    let lowered = error_msg.to_lowercase();
    if lowered.contains("429") || lowered.contains("rate") {
        return false;
    }
    lowered.contains("400") || lowered.contains("invalid")
}

#[async_trait]
impl SmsProvider for TwilioSmsProvider {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let phone = validate_phone_number(phone_number)?;
        check_length(message)?;
        info!(
            "Sending SMS to {} via Twilio (message length: {} chars)",
            mask_phone_number(&phone),
            message.chars().count()
        );
        self.send_with_retry(&phone, message).await
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}
