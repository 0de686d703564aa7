//! LINE Login: profile lookup with a user access token, and the
//! authorization-code exchange for the browser flow.

use async_trait::async_trait;
use lc_core::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use lc_core::errors::{DomainError, DomainResult};
use lc_core::services::{IdentityProvider, OAuthCodeExchanger};
use lc_shared::config::OAuthClientConfig;
use reqwest::Client;
use serde::Deserialize;

use super::http::{invalid_credential, read_exchange_json, read_json, transport_error, url_with_params};

const API_BASE: &str = "https://api.line.me";
const AUTHORIZE_URL: &str = "https://access.line.me/oauth2/v2.1/authorize";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineProfile {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub picture_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LineTokenResponse {
    pub access_token: Option<String>,
}

impl LineProfile {
    pub(crate) fn into_identity(self) -> Option<ExternalIdentity> {
        let user_id = self.user_id.filter(|id| !id.is_empty())?;
        Some(ExternalIdentity {
            provider_username: self.display_name.clone(),
            display_name: self.display_name,
            avatar_url: self.picture_url,
            ..ExternalIdentity::new(user_id)
        })
    }
}

pub struct LineIdentityProvider {
    http: Client,
    client: OAuthClientConfig,
    api_base: String,
}

impl LineIdentityProvider {
    pub fn new(http: Client, client: OAuthClientConfig) -> Self {
        Self {
            http,
            client,
            api_base: API_BASE.to_string(),
        }
    }

    /// Point profile and token calls at another host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl IdentityProvider for LineIdentityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Line
    }

    async fn resolve_identity(&self, credential: &Credential) -> DomainResult<ExternalIdentity> {
        let Credential::AccessToken(token) = credential else {
            return Err(invalid_credential(ProviderKind::Line));
        };

        let response = self
            .http
            .get(format!("{}/v2/profile", self.api_base))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(ProviderKind::Line, e))?;

        let profile: LineProfile = read_json(ProviderKind::Line, response).await?;
        profile
            .into_identity()
            .ok_or_else(|| invalid_credential(ProviderKind::Line))
    }
}

#[async_trait]
impl OAuthCodeExchanger for LineIdentityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Line
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        url_with_params(
            AUTHORIZE_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.client.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("state", state),
                ("scope", "profile openid"),
            ],
        )
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> DomainResult<String> {
        let response = self
            .http
            .post(format!("{}/oauth2/v2.1/token", self.api_base))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.client.client_id.as_str()),
                ("client_secret", self.client.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(ProviderKind::Line, e))?;

        let token: LineTokenResponse = read_exchange_json(ProviderKind::Line, response).await?;
        token
            .access_token
            .ok_or_else(|| DomainError::upstream("LINE", "token response has no access_token"))
    }
}
