use async_trait::async_trait;

use crate::domain::value_objects::identity::ProviderKind;
use crate::errors::DomainResult;

/// Authorization-code half of an OAuth provider
#[async_trait]
pub trait OAuthCodeExchanger: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Provider consent page the browser is sent to
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String;

    /// Trade an authorization code for the token the login endpoint accepts
    /// (an access token, or an ID token for Google)
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> DomainResult<String>;
}
