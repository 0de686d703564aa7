//! Shared wiring for the auth flow tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use lc_shared::Language;

use crate::domain::entities::user::{NewUser, User};
use crate::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use crate::errors::{AuthError, DomainResult};
use crate::repositories::{InMemoryStore, UserRepository};
use crate::services::auth::{AuthRepositories, AuthService, LoginContext};
use crate::services::cache::InMemoryCache;
use crate::services::clock::ManualClock;
use crate::services::identity::{
    IdentityProvider, PasswordIdentityProvider, PhoneIdentityProvider, ProviderRegistry,
};
use crate::services::otp::tests::mocks::RecordingSmsDispatcher;
use crate::services::otp::{OtpService, OtpServiceConfig};
use crate::services::token::{hash_password_with_cost, TokenCodec, TokenServiceConfig};

pub const PHONE: &str = "+886912345678";
pub const PASSWORD: &str = "s3cret-pass";

/// Social provider double: `"bad"` is rejected, any other token resolves to
/// the configured identity
pub struct FakeSocialProvider {
    kind: ProviderKind,
    identity: ExternalIdentity,
    calls: AtomicUsize,
}

impl FakeSocialProvider {
    pub fn new(kind: ProviderKind, identity: ExternalIdentity) -> Self {
        Self {
            kind,
            identity,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeSocialProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn resolve_identity(&self, credential: &Credential) -> DomainResult<ExternalIdentity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match credential {
            Credential::AccessToken(token) if token != "bad" => Ok(self.identity.clone()),
            _ => Err(AuthError::InvalidCredential {
                provider: self.kind.as_str().to_string(),
            }
            .into()),
        }
    }
}

pub fn line_identity() -> ExternalIdentity {
    ExternalIdentity {
        provider_user_id: "U1234567890abcdef".to_string(),
        display_name: Some("Line Tester".to_string()),
        avatar_url: Some("https://profile.line-scdn.net/avatar".to_string()),
        ..ExternalIdentity::default()
    }
}

pub struct Harness {
    pub service: AuthService,
    pub store: InMemoryStore,
    pub cache: InMemoryCache,
    pub clock: ManualClock,
    pub sms: RecordingSmsDispatcher,
    pub otp: Arc<OtpService>,
    pub line: Arc<FakeSocialProvider>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_line_identity(line_identity())
    }

    pub fn with_line_identity(identity: ExternalIdentity) -> Self {
        let clock = ManualClock::starting_now();
        let store = InMemoryStore::new();
        let cache = InMemoryCache::with_clock(Arc::new(clock.clone()));
        let sms = RecordingSmsDispatcher::new();

        let otp = Arc::new(OtpService::with_clock(
            Arc::new(cache.clone()),
            Arc::new(sms.clone()),
            Arc::new(store.clone()),
            OtpServiceConfig::default(),
            Arc::new(clock.clone()),
        ));
        let codec = Arc::new(TokenCodec::with_clock(
            TokenServiceConfig {
                jwt_secret: "auth-flow-test-secret".to_string(),
                ..TokenServiceConfig::default()
            },
            Arc::new(clock.clone()),
        ));

        let line = Arc::new(FakeSocialProvider::new(ProviderKind::Line, identity));
        let mut registry = ProviderRegistry::with_unsupported_placeholders();
        registry
            .register(Arc::new(PasswordIdentityProvider::new(Arc::new(store.clone()))))
            .register(Arc::new(PhoneIdentityProvider::new(otp.clone())))
            .register(line.clone());

        let service = AuthService::with_clock(
            AuthRepositories::from_store(store.clone()),
            codec,
            otp.clone(),
            Arc::new(registry),
            Arc::new(clock.clone()),
        );

        Self {
            service,
            store,
            cache,
            clock,
            sms,
            otp,
            line,
        }
    }

    pub fn context() -> LoginContext {
        LoginContext::new(
            Some("203.0.113.7".to_string()),
            Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) LiveCommerce/2.1".to_string()),
        )
    }

    /// User with an email and a bcrypt password
    pub async fn seed_password_user(&self, email: &str) -> User {
        let mut user = NewUser::viewer(email, "Password User", Utc::now());
        user.email = Some(email.to_string());
        user.password_hash = Some(hash_password_with_cost(PASSWORD, 4).unwrap());
        self.store.create(user).await.unwrap()
    }

    pub async fn seed_phone_user(&self, phone: &str) -> User {
        let mut user = NewUser::viewer(phone, "Phone User", Utc::now());
        user.phone_number = Some(phone.to_string());
        self.store.create(user).await.unwrap()
    }

    /// Send a registration code and return what was delivered
    pub async fn registration_code(&self, phone: &str) -> String {
        self.otp
            .send_verification_code(phone, Language::English)
            .await
            .unwrap();
        self.sms.last_code_for(phone).unwrap()
    }

    pub async fn login_code(&self, phone: &str) -> String {
        self.otp.send_login_code(phone, Language::English).await.unwrap();
        self.sms.last_code_for(phone).unwrap()
    }
}
