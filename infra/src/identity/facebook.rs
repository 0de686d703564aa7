//! Facebook Login over the Graph API.

use async_trait::async_trait;
use lc_core::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use lc_core::errors::{DomainError, DomainResult};
use lc_core::services::{IdentityProvider, OAuthCodeExchanger};
use lc_shared::config::OAuthClientConfig;
use reqwest::Client;
use serde::Deserialize;

use super::http::{invalid_credential, read_exchange_json, read_json, transport_error, url_with_params};

const GRAPH_URL: &str = "https://graph.facebook.com/v18.0";
const AUTHORIZE_URL: &str = "https://www.facebook.com/v18.0/dialog/oauth";

#[derive(Debug, Deserialize)]
pub(crate) struct FacebookProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<FacebookPicture>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FacebookPicture {
    pub data: Option<FacebookPictureData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FacebookPictureData {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacebookTokenResponse {
    access_token: Option<String>,
}

impl FacebookProfile {
    pub(crate) fn into_identity(self) -> Option<ExternalIdentity> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let avatar_url = self.picture.and_then(|p| p.data).and_then(|d| d.url);
        Some(ExternalIdentity {
            provider_username: self.name.clone(),
            display_name: self.name,
            email: self.email,
            avatar_url,
            ..ExternalIdentity::new(id)
        })
    }
}

pub struct FacebookIdentityProvider {
    http: Client,
    client: OAuthClientConfig,
}

impl FacebookIdentityProvider {
    pub fn new(http: Client, client: OAuthClientConfig) -> Self {
        Self { http, client }
    }
}

#[async_trait]
impl IdentityProvider for FacebookIdentityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Facebook
    }

    async fn resolve_identity(&self, credential: &Credential) -> DomainResult<ExternalIdentity> {
        let Credential::AccessToken(token) = credential else {
            return Err(invalid_credential(ProviderKind::Facebook));
        };

        let response = self
            .http
            .get(format!("{}/me", GRAPH_URL))
            .query(&[("fields", "id,name,picture"), ("access_token", token.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(ProviderKind::Facebook, e))?;

        let profile: FacebookProfile = read_json(ProviderKind::Facebook, response).await?;
        profile
            .into_identity()
            .ok_or_else(|| invalid_credential(ProviderKind::Facebook))
    }
}

#[async_trait]
impl OAuthCodeExchanger for FacebookIdentityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Facebook
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        url_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("state", state),
                ("response_type", "code"),
                ("scope", "public_profile"),
            ],
        )
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> DomainResult<String> {
        let response = self
            .http
            .get(format!("{}/oauth/access_token", GRAPH_URL))
            .query(&[
                ("client_id", self.client.client_id.as_str()),
                ("client_secret", self.client.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| transport_error(ProviderKind::Facebook, e))?;

        let token: FacebookTokenResponse = read_exchange_json(ProviderKind::Facebook, response).await?;
        token
            .access_token
            .ok_or_else(|| DomainError::upstream("Facebook", "token response has no access_token"))
    }
}
