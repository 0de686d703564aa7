//! Service wiring from `AppConfig`

use std::sync::Arc;

use anyhow::Context;
use lc_core::repositories::{CountryRepository, InMemoryStore};
use lc_core::services::{
    ExpiringCache, InMemoryCache, OtpServiceConfig, PasswordIdentityProvider,
    PhoneIdentityProvider, SmsDispatcher, TokenServiceConfig,
};
use lc_core::{AuthRepositories, AuthService, OAuthSessionService, OtpService, ProviderRegistry, TokenCodec};
use lc_infra::cache::{RedisClient, RedisExpiringCache};
use lc_infra::database::DatabasePool;
use lc_infra::identity::{build_social_providers, SocialProviders};
use lc_infra::sms::build_router;
use lc_shared::{AppConfig, StorageBackend};

use crate::state::AppState;

/// Durable stores and the shared cache for one storage backend
pub struct Storage {
    pub repositories: AuthRepositories,
    pub countries: Arc<dyn CountryRepository>,
    pub cache: Arc<dyn ExpiringCache>,
}

impl Storage {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        match config.storage {
            StorageBackend::Mysql => {
                let pool = DatabasePool::connect(config.database.clone())
                    .await
                    .context("Failed to connect to MySQL")?;
                log::info!("Database pool ready: {}", pool.get_statistics());

                let redis = RedisClient::new(config.cache.clone())
                    .await
                    .context("Failed to connect to Redis")?;

                Ok(Self {
                    repositories: pool.auth_repositories(),
                    countries: pool.country_repository(),
                    cache: Arc::new(RedisExpiringCache::new(redis)),
                })
            }
            StorageBackend::Memory => {
                if config.environment.is_production() {
                    log::warn!("In-memory storage selected in production; data is lost on restart");
                }
                Ok(Self::in_memory(InMemoryStore::new(), InMemoryCache::new()))
            }
        }
    }

    pub fn in_memory(store: InMemoryStore, cache: InMemoryCache) -> Self {
        Self {
            repositories: AuthRepositories::from_store(store.clone()),
            countries: Arc::new(store),
            cache: Arc::new(cache),
        }
    }
}

/// Compose the core services over `storage`, an SMS dispatcher and the
/// configured social providers
pub fn assemble(
    config: &AppConfig,
    storage: Storage,
    sms: Arc<dyn SmsDispatcher>,
    social: SocialProviders,
) -> AppState {
    let Storage {
        repositories,
        countries,
        cache,
    } = storage;

    let otp = Arc::new(OtpService::new(
        cache.clone(),
        sms,
        repositories.users.clone(),
        OtpServiceConfig::default(),
    ));
    let codec = Arc::new(TokenCodec::new(TokenServiceConfig::from(&config.jwt)));

    let mut registry = ProviderRegistry::with_unsupported_placeholders();
    registry
        .register(Arc::new(PasswordIdentityProvider::new(repositories.users.clone())))
        .register(Arc::new(PhoneIdentityProvider::new(otp.clone())));
    for provider in social.identity {
        registry.register(provider);
    }

    let mut oauth = OAuthSessionService::new(
        cache,
        config.server.api_base_url.clone(),
        config.social.callback_session_ttl_secs,
    );
    for exchanger in social.exchangers {
        oauth.register(exchanger);
    }

    let auth = Arc::new(AuthService::new(repositories, codec, otp.clone(), Arc::new(registry)));
    AppState::new(auth, otp, Arc::new(oauth), countries)
}

/// Connect storage, build the SMS router and identity providers, and wire
/// everything into `AppState`
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = Storage::connect(config).await?;

    let router = build_router(&config.sms).await;
    if !router.has_fallback() && router.country_count() == 0 {
        log::warn!("No SMS transport available; verification codes cannot be delivered");
    }

    let social = build_social_providers(&config.social).context("Failed to build social identity providers")?;

    Ok(assemble(config, storage, Arc::new(router), social))
}
