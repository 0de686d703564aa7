//! Identity provider names, credentials and resolved external identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every login method the platform knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Password,
    Phone,
    Line,
    Facebook,
    Google,
    Apple,
    Instagram,
    Kapook,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 8] = [
        ProviderKind::Password,
        ProviderKind::Phone,
        ProviderKind::Line,
        ProviderKind::Facebook,
        ProviderKind::Google,
        ProviderKind::Apple,
        ProviderKind::Instagram,
        ProviderKind::Kapook,
    ];

    /// Providers that take part in the browser redirect flow
    pub const OAUTH_CALLBACK: [ProviderKind; 3] =
        [ProviderKind::Line, ProviderKind::Facebook, ProviderKind::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Password => "password",
            ProviderKind::Phone => "phone",
            ProviderKind::Line => "line",
            ProviderKind::Facebook => "facebook",
            ProviderKind::Google => "google",
            ProviderKind::Apple => "apple",
            ProviderKind::Instagram => "instagram",
            ProviderKind::Kapook => "kapook",
        }
    }

    /// Social providers that hand out third-party tokens
    pub fn is_social(&self) -> bool {
        !matches!(self, ProviderKind::Password | ProviderKind::Phone)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Password => "Password",
            ProviderKind::Phone => "Phone",
            ProviderKind::Line => "LINE",
            ProviderKind::Facebook => "Facebook",
            ProviderKind::Google => "Google",
            ProviderKind::Apple => "Apple",
            ProviderKind::Instagram => "Instagram",
            ProviderKind::Kapook => "Kapook",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| format!("unknown provider: {}", s))
    }
}

/// Provider-specific proof of identity
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Password { email: String, password: String },
    PhoneOtp { phone: String, code: String },
    /// OAuth access token, or a Google ID token
    AccessToken(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            Credential::PhoneOtp { phone, .. } => f
                .debug_struct("PhoneOtp")
                .field("phone", &lc_shared::phone::mask_phone_number(phone))
                .field("code", &"[REDACTED]")
                .finish(),
            Credential::AccessToken(_) => f.write_str("AccessToken([REDACTED])"),
        }
    }
}

/// What a provider tells us about the account after verifying a credential
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    pub provider_user_id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
    pub provider_username: Option<String>,
}

impl ExternalIdentity {
    pub fn new(provider_user_id: impl Into<String>) -> Self {
        Self {
            provider_user_id: provider_user_id.into(),
            ..Self::default()
        }
    }
}
