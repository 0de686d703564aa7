//! Social identity providers backed by the providers' HTTP APIs
//!
//! A provider is only built when its client credentials are configured;
//! an unconfigured provider stays out of the registry and login through it
//! reports `ProviderNotConfigured`.

use std::sync::Arc;

use lc_core::services::{IdentityProvider, OAuthCodeExchanger};
use lc_shared::SocialConfig;
use tracing::{info, warn};

use crate::InfrastructureError;

pub mod facebook;
pub mod google;
pub mod http;
pub mod line;


pub use facebook::FacebookIdentityProvider;
pub use google::GoogleIdentityProvider;
pub use http::build_http_client;
pub use line::LineIdentityProvider;

/// Configured social providers, in both of their roles
#[derive(Default, Clone)]
pub struct SocialProviders {
    pub identity: Vec<Arc<dyn IdentityProvider>>,
    pub exchangers: Vec<Arc<dyn OAuthCodeExchanger>>,
}

impl SocialProviders {
    fn add<P>(&mut self, provider: P)
    where
        P: IdentityProvider + OAuthCodeExchanger + 'static,
    {
        let provider = Arc::new(provider);
        self.identity.push(provider.clone());
        self.exchangers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identity.is_empty()
    }
}

pub fn build_social_providers(config: &SocialConfig) -> Result<SocialProviders, InfrastructureError> {
    let http = build_http_client(config.request_timeout_secs)?;
    let mut providers = SocialProviders::default();

    match &config.line {
        Some(client) => providers.add(LineIdentityProvider::new(http.clone(), client.clone())),
        None => warn!("LINE login disabled: LINE_CHANNEL_ID/LINE_CHANNEL_SECRET not set"),
    }
    match &config.facebook {
        Some(client) => providers.add(FacebookIdentityProvider::new(http.clone(), client.clone())),
        None => warn!("Facebook login disabled: FACEBOOK_APP_ID/FACEBOOK_APP_SECRET not set"),
    }
    match &config.google {
        Some(client) => providers.add(GoogleIdentityProvider::new(http, client.clone())),
        None => warn!("Google login disabled: GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET not set"),
    }

    info!(count = providers.len(), "Social identity providers configured");
    Ok(providers)
}
