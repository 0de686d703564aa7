//! AWS SNS SMS transport

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::{config::Region, types::MessageAttributeValue, Client as SnsClient};
use lc_shared::config::AwsSnsSettings;
use lc_shared::phone::mask_phone_number;
use tracing::{debug, error, info, warn};

use super::{check_length, validate_phone_number, RetryPolicy, SmsProvider};
use crate::InfrastructureError;

/// Verification codes are always sent as transactional messages
const SMS_TYPE: &str = "Transactional";

pub struct AwsSnsSmsProvider {
    client: SnsClient,
    sender_id: Option<String>,
    retry: RetryPolicy,
}

impl AwsSnsSmsProvider {
    pub async fn new(settings: AwsSnsSettings, retry: RetryPolicy) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None,
            None,
            "lc_sms_router",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        info!("AWS SNS SMS transport initialized for region: {}", settings.region);
        if let Some(sender_id) = &settings.sender_id {
            info!("Using sender ID: {}", sender_id);
        }

        Self {
            client: SnsClient::new(&aws_config),
            sender_id: settings.sender_id,
            retry,
        }
    }

    fn sms_attributes(&self) -> Result<HashMap<String, MessageAttributeValue>, InfrastructureError> {
        let mut attributes = HashMap::new();
        attributes.insert(
            "AWS.SNS.SMS.SMSType".to_string(),
            string_attribute(SMS_TYPE)?,
        );
        if let Some(sender_id) = &self.sender_id {
            attributes.insert(
                "AWS.SNS.SMS.SenderID".to_string(),
                string_attribute(sender_id)?,
            );
        }
        Ok(attributes)
    }

    async fn send_with_retry(&self, to: &str, message: &str) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = self.retry.retry_delay;

        loop {
            attempts += 1;
            debug!(
                "Sending SMS attempt {}/{} to {} via AWS SNS",
                attempts,
                self.retry.max_retries,
                mask_phone_number(to)
            );

            let result = self
                .client
                .publish()
                .phone_number(to)
                .message(message)
                .set_message_attributes(Some(self.sms_attributes()?))
                .send()
                .await;

            match result {
                Ok(response) => {
                    let message_id = response.message_id().unwrap_or("unknown").to_string();
                    info!(
                        "SMS sent to {} via AWS SNS with message ID: {}",
                        mask_phone_number(to),
                        message_id
                    );
                    return Ok(message_id);
                }
                Err(e) => {
                    error!(
                        "Failed to send SMS via AWS SNS (attempt {}/{}): {}",
                        attempts, self.retry.max_retries, e
                    );

                    if attempts >= self.retry.max_retries {
                        return Err(InfrastructureError::Sms(format!(
                            "AWS SNS gave up after {} attempts: {}",
                            attempts, e
                        )));
                    }

                    let error_msg = format!("{:?}", e);
                    if is_validation_error(&error_msg) {
                        return Err(InfrastructureError::Sms(format!(
                            "Invalid request to AWS SNS: {}",
                            e
                        )));
                    }
                    warn!("Retrying AWS SNS publish after {:?}", delay);

                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

fn string_attribute(value: &str) -> Result<MessageAttributeValue, InfrastructureError> {
    MessageAttributeValue::builder()
        .data_type("String")
        .string_value(value)
        .build()
        .map_err(|e| InfrastructureError::Sms(format!("Invalid SNS message attribute: {}", e)))
}

pub(crate) fn is_validation_error(error_msg: &str) -> bool {
    ["InvalidParameter", "InvalidPhoneNumber", "ValidationError"]
        .iter()
        .any(|marker| error_msg.contains(marker))
}

#[async_trait]
impl SmsProvider for AwsSnsSmsProvider {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let phone = validate_phone_number(phone_number)?;
        check_length(message)?;
        info!(
            "Sending SMS to {} via AWS SNS (message length: {} chars)",
            mask_phone_number(&phone),
            message.chars().count()
        );
        self.send_with_retry(&phone, message).await
    }

    fn provider_name(&self) -> &str {
        "aws-sns"
    }
}
