//! Google Sign-In: ID token verification through the tokeninfo endpoint.
//!
//! Besides what tokeninfo checks itself (signature, expiry), the token must
//! be issued by Google to this application's client id.

use async_trait::async_trait;
use lc_core::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use lc_core::errors::{DomainError, DomainResult};
use lc_core::services::{IdentityProvider, OAuthCodeExchanger};
use lc_shared::config::OAuthClientConfig;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use super::http::{invalid_credential, read_exchange_json, read_json, transport_error, url_with_params};

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleTokenInfo {
    pub sub: Option<String>,
    pub aud: Option<String>,
    pub iss: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "bool_or_string")]
    pub email_verified: bool,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    id_token: Option<String>,
}

/// tokeninfo reports booleans as `"true"`/`"false"` strings
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Text(text)) => text.eq_ignore_ascii_case("true"),
        None => false,
    })
}

impl GoogleTokenInfo {
    /// Check issuer and audience, then map to an identity. `None` means the
    /// token must be rejected.
    pub(crate) fn into_identity(self, client_id: &str) -> Option<ExternalIdentity> {
        let sub = self.sub.filter(|s| !s.is_empty())?;

        let issuer = self.iss.as_deref().unwrap_or_default();
        if !ISSUERS.contains(&issuer) {
            tracing::warn!(issuer, "Google token from unexpected issuer");
            return None;
        }
        if self.aud.as_deref() != Some(client_id) {
            tracing::warn!("Google token issued for another client");
            return None;
        }

        Some(ExternalIdentity {
            provider_username: self.email.clone(),
            display_name: self.name,
            email: self.email,
            avatar_url: self.picture,
            email_verified: self.email_verified,
            ..ExternalIdentity::new(sub)
        })
    }
}

pub struct GoogleIdentityProvider {
    http: Client,
    client: OAuthClientConfig,
}

impl GoogleIdentityProvider {
    pub fn new(http: Client, client: OAuthClientConfig) -> Self {
        Self { http, client }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn resolve_identity(&self, credential: &Credential) -> DomainResult<ExternalIdentity> {
        let Credential::AccessToken(id_token) = credential else {
            return Err(invalid_credential(ProviderKind::Google));
        };

        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(ProviderKind::Google, e))?;

        let info: GoogleTokenInfo = read_json(ProviderKind::Google, response).await?;
        info.into_identity(&self.client.client_id)
            .ok_or_else(|| invalid_credential(ProviderKind::Google))
    }
}

#[async_trait]
impl OAuthCodeExchanger for GoogleIdentityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        url_with_params(
            AUTHORIZE_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.client.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("state", state),
                ("scope", "openid email profile"),
            ],
        )
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> DomainResult<String> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.client.client_id.as_str()),
                ("client_secret", self.client.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(ProviderKind::Google, e))?;

        let token: GoogleTokenResponse = read_exchange_json(ProviderKind::Google, response).await?;
        token
            .id_token
            .ok_or_else(|| DomainError::upstream("Google", "token response has no id_token"))
    }
}
