//! SMS transport configuration
//!
//! Codes are routed per country (ISO 3166-1 alpha-2 region of the destination
//! number) with an optional global fallback transport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{env_opt, env_or};

/// SMS transports the router knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmsProviderKind {
    Twilio,
    AwsSns,
    /// Writes the message to the log instead of sending it
    Log,
}

impl std::str::FromStr for SmsProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twilio" => Ok(SmsProviderKind::Twilio),
            "aws-sns" | "aws_sns" | "sns" => Ok(SmsProviderKind::AwsSns),
            "log" | "mock" | "console" => Ok(SmsProviderKind::Log),
            other => Err(format!("Unknown SMS provider: {}", other)),
        }
    }
}

/// Twilio credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwilioSettings {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

/// AWS SNS credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AwsSnsSettings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    #[serde(default)]
    pub sender_id: Option<String>,
}

/// SMS routing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Transport used when no country-specific transport matches
    #[serde(default)]
    pub fallback_provider: Option<SmsProviderKind>,

    /// Region code (e.g. "TW") to transport
    #[serde(default)]
    pub country_providers: HashMap<String, SmsProviderKind>,

    #[serde(default)]
    pub twilio: Option<TwilioSettings>,

    #[serde(default)]
    pub aws_sns: Option<AwsSnsSettings>,

    /// Maximum send attempts per message
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            fallback_provider: Some(SmsProviderKind::Log),
            country_providers: HashMap::new(),
            twilio: None,
            aws_sns: None,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    ///
    /// `SMS_COUNTRY_PROVIDERS` uses the form `TW=twilio,TH=aws-sns`.
    pub fn from_env() -> Self {
        let fallback_provider = match env_opt("SMS_FALLBACK_PROVIDER") {
            Some(v) if v.eq_ignore_ascii_case("none") => None,
            Some(v) => v.parse().ok(),
            None => Some(SmsProviderKind::Log),
        };

        let country_providers = env_opt("SMS_COUNTRY_PROVIDERS")
            .map(|v| parse_country_providers(&v))
            .unwrap_or_default();

        let twilio = match (
            env_opt("TWILIO_ACCOUNT_SID"),
            env_opt("TWILIO_AUTH_TOKEN"),
            env_opt("TWILIO_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioSettings {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        let aws_sns = match (env_opt("AWS_ACCESS_KEY_ID"), env_opt("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AwsSnsSettings {
                access_key_id,
                secret_access_key,
                region: env_opt("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                sender_id: env_opt("AWS_SNS_SENDER_ID"),
            }),
            _ => None,
        };

        Self {
            fallback_provider,
            country_providers,
            twilio,
            aws_sns,
            max_retries: env_or("SMS_MAX_RETRIES", 3),
            retry_delay_ms: env_or("SMS_RETRY_DELAY_MS", 1000),
        }
    }
}

/// Parse `TW=twilio,TH=aws-sns`; malformed entries are skipped
pub fn parse_country_providers(raw: &str) -> HashMap<String, SmsProviderKind> {
    raw.split(',')
        .filter_map(|entry| {
            let (country, provider) = entry.split_once('=')?;
            let country = country.trim().to_uppercase();
            if country.len() != 2 {
                return None;
            }
            Some((country, provider.parse().ok()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_country_providers() {
        let map = parse_country_providers("tw=twilio, TH=aws-sns,JP=carrier-pigeon,bad");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("TW"), Some(&SmsProviderKind::Twilio));
        assert_eq!(map.get("TH"), Some(&SmsProviderKind::AwsSns));
    }

    #[test]
    fn test_default_falls_back_to_log_transport() {
        assert_eq!(SmsConfig::default().fallback_provider, Some(SmsProviderKind::Log));
    }
}
