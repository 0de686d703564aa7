//! Shared wiring for the HTTP tests: in-memory storage, a logging SMS
//! transport and a scripted LINE provider.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use chrono::Utc;
use lc_api::bootstrap::{assemble, Storage};
use lc_api::AppState;
use lc_core::domain::{Credential, ExternalIdentity, NewUser, ProviderKind, User};
use lc_core::errors::{AuthError, DomainError, DomainResult};
use lc_core::repositories::{InMemoryStore, UserRepository};
use lc_core::services::otp::{rate_limit_key, verification_key};
use lc_core::services::token::hash_password_with_cost;
use lc_core::services::{ExpiringCache, IdentityProvider, InMemoryCache, OAuthCodeExchanger};
use lc_infra::identity::SocialProviders;
use lc_infra::sms::{LogSmsProvider, SmsProvider, SmsRouter};
use lc_shared::AppConfig;

pub const PHONE: &str = "+886912345678";
pub const EMAIL: &str = "host@example.com";
pub const PASSWORD: &str = "s3cret-pass";

/// LINE double: `"bad"` access tokens and codes other than `"good-code"`
/// are rejected
pub struct FakeLineProvider;

#[async_trait]
impl IdentityProvider for FakeLineProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Line
    }

    async fn resolve_identity(&self, credential: &Credential) -> DomainResult<ExternalIdentity> {
        match credential {
            Credential::AccessToken(token) if token != "bad" => Ok(ExternalIdentity {
                provider_user_id: "U1234567890abcdef".to_string(),
                display_name: Some("Line Tester".to_string()),
                ..ExternalIdentity::default()
            }),
            _ => Err(AuthError::InvalidCredential {
                provider: "line".to_string(),
            }
            .into()),
        }
    }
}

#[async_trait]
impl OAuthCodeExchanger for FakeLineProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Line
    }

    fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "https://access.line.me/oauth2/v2.1/authorize?redirect_uri={}&state={}",
            redirect_uri, state
        )
    }

    async fn exchange_code(&self, code: &str, _redirect_uri: &str) -> DomainResult<String> {
        if code == "good-code" {
            Ok("line-access-token".to_string())
        } else {
            Err(DomainError::upstream("line", "invalid_grant"))
        }
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub store: InMemoryStore,
    pub cache: InMemoryCache,
}

impl TestContext {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let cache = InMemoryCache::new();
        let identity: Arc<dyn IdentityProvider> = Arc::new(FakeLineProvider);
        let exchanger: Arc<dyn OAuthCodeExchanger> = Arc::new(FakeLineProvider);
        let social = SocialProviders {
            identity: vec![identity],
            exchangers: vec![exchanger],
        };
        let transport: Arc<dyn SmsProvider> = Arc::new(LogSmsProvider::new());
        let router = SmsRouter::new(Some(transport));

        let state = assemble(
            &AppConfig::default(),
            Storage::in_memory(store.clone(), cache.clone()),
            Arc::new(router),
            social,
        );

        Self {
            state: web::Data::new(state),
            store,
            cache,
        }
    }

    /// Password account with `email`
    pub async fn seed_password_user(&self, email: &str) -> User {
        let mut user = NewUser::viewer(
            email.split('@').next().unwrap_or(email),
            "Stream Host",
            Utc::now(),
        );
        user.email = Some(email.to_string());
        user.password_hash = Some(hash_password_with_cost(PASSWORD, 4).unwrap());
        self.store.create(user).await.unwrap()
    }

    /// Code currently stored for `phone`
    pub async fn stored_code(&self, phone: &str) -> String {
        self.cache
            .get(&verification_key(phone))
            .await
            .unwrap()
            .expect("no verification code stored")
    }

    /// Drop the resend cooldown for `phone`
    pub async fn clear_cooldown(&self, phone: &str) {
        self.cache.delete(&rate_limit_key(phone)).await.unwrap();
    }
}
