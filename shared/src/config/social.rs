//! OAuth client configuration for the social identity providers

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

/// Client credentials registered with one OAuth provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl OAuthClientConfig {
    fn from_env(id_key: &str, secret_key: &str) -> Option<Self> {
        Some(Self {
            client_id: env_opt(id_key)?,
            client_secret: env_opt(secret_key)?,
        })
    }
}

/// Social login configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SocialConfig {
    /// Upper bound for every call to a provider endpoint, in seconds
    pub request_timeout_secs: u64,

    /// Lifetime of the OAuth polling record, in seconds
    pub callback_session_ttl_secs: u64,

    #[serde(default)]
    pub line: Option<OAuthClientConfig>,

    #[serde(default)]
    pub facebook: Option<OAuthClientConfig>,

    #[serde(default)]
    pub google: Option<OAuthClientConfig>,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            callback_session_ttl_secs: 300,
            line: None,
            facebook: None,
            google: None,
        }
    }
}

impl SocialConfig {
    pub fn from_env() -> Self {
        Self {
            request_timeout_secs: env_or("SOCIAL_REQUEST_TIMEOUT_SECS", 10),
            callback_session_ttl_secs: env_or("SOCIAL_CALLBACK_SESSION_TTL_SECS", 300),
            line: OAuthClientConfig::from_env("LINE_CHANNEL_ID", "LINE_CHANNEL_SECRET"),
            facebook: OAuthClientConfig::from_env("FACEBOOK_APP_ID", "FACEBOOK_APP_SECRET"),
            google: OAuthClientConfig::from_env("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"),
        }
    }
}
