use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;

use crate::domain::value_objects::identity::ProviderKind;
use crate::domain::value_objects::oauth_session::OAuthSessionState;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::services::cache::ExpiringCache;

use super::traits::OAuthCodeExchanger;

pub fn session_key(kind: ProviderKind, state: &str) -> String {
    format!("{}_session:{}", kind.as_str(), state)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuthSessionStart {
    pub session_id: String,
    pub authorize_url: String,
}

pub struct OAuthSessionService {
    cache: Arc<dyn ExpiringCache>,
    exchangers: HashMap<ProviderKind, Arc<dyn OAuthCodeExchanger>>,
    api_base_url: String,
    ttl_seconds: u64,
}

impl OAuthSessionService {
    pub fn new(cache: Arc<dyn ExpiringCache>, api_base_url: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            cache,
            exchangers: HashMap::new(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            ttl_seconds,
        }
    }

    pub fn register(&mut self, exchanger: Arc<dyn OAuthCodeExchanger>) -> &mut Self {
        self.exchangers.insert(exchanger.kind(), exchanger);
        self
    }

    pub fn redirect_uri(&self, kind: ProviderKind) -> String {
        format!("{}/auth/social/{}/callback", self.api_base_url, kind.as_str())
    }

    fn exchanger(&self, kind: ProviderKind) -> DomainResult<&Arc<dyn OAuthCodeExchanger>> {
        self.exchangers.get(&kind).ok_or_else(|| {
            AuthError::ProviderNotConfigured {
                provider: kind.display_name().to_string(),
            }
            .into()
        })
    }

    async fn store(&self, kind: ProviderKind, state: &str, record: &OAuthSessionState) -> DomainResult<()> {
        let value = serde_json::to_string(record)
            .map_err(|e| DomainError::internal(format!("Failed to encode OAuth session: {}", e)))?;
        self.cache
            .set_with_expiry(&session_key(kind, state), &value, self.ttl_seconds)
            .await
    }

    /// Create a pending polling record and the URL the app should open
    pub async fn start_session(&self, kind: ProviderKind) -> DomainResult<OAuthSessionStart> {
        let exchanger = self.exchanger(kind)?;
        let state = generate_state();

        self.store(kind, &state, &OAuthSessionState::Pending).await?;
        tracing::info!(provider = %kind, event = "oauth_session_started", "OAuth session started");

        Ok(OAuthSessionStart {
            authorize_url: exchanger.authorize_url(&self.redirect_uri(kind), &state),
            session_id: state,
        })
    }

    /// Handle the provider redirect and record the outcome under `state`.
    ///
    /// A provider-reported error or a failed exchange is stored as `failed`
    /// and returned as such; only a request with neither code nor error is
    /// rejected outright.
    pub async fn handle_callback(
        &self,
        kind: ProviderKind,
        code: Option<&str>,
        state: &str,
        provider_error: Option<&str>,
    ) -> DomainResult<OAuthSessionState> {
        let exchanger = self.exchanger(kind)?;
        if state.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "state".to_string(),
            }
            .into());
        }

        let outcome = match (code.filter(|c| !c.is_empty()), provider_error) {
            (_, Some(error)) => OAuthSessionState::Failed {
                error: error.to_string(),
            },
            (Some(code), None) => match exchanger.exchange_code(code, &self.redirect_uri(kind)).await {
                Ok(access_token) => OAuthSessionState::Completed { access_token },
                Err(e) => {
                    tracing::warn!(provider = %kind, error = %e, event = "oauth_exchange_failed", "Authorization code exchange failed");
                    OAuthSessionState::Failed { error: e.to_string() }
                }
            },
            (None, None) => {
                return Err(ValidationError::RequiredField {
                    field: "code".to_string(),
                }
                .into())
            }
        };

        self.store(kind, state, &outcome).await?;
        tracing::info!(
            provider = %kind,
            completed = matches!(outcome, OAuthSessionState::Completed { .. }),
            event = "oauth_callback_handled",
            "OAuth callback handled"
        );
        Ok(outcome)
    }

    /// Single-read polling: a terminal record is returned once, then deleted.
    /// Unknown ids read as pending.
    pub async fn poll_status(&self, session_id: &str) -> DomainResult<OAuthSessionState> {
        for kind in ProviderKind::OAUTH_CALLBACK {
            let key = session_key(kind, session_id);
            let Some(raw) = self.cache.get(&key).await? else {
                continue;
            };

            let record: OAuthSessionState = serde_json::from_str(&raw)
                .map_err(|e| DomainError::internal(format!("Corrupt OAuth session record: {}", e)))?;
            if record.is_terminal() {
                self.cache.delete(&key).await?;
            }
            return Ok(record);
        }
        Ok(OAuthSessionState::Pending)
    }
}

/// 256-bit URL-safe state token
fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::services::cache::InMemoryCache;

    struct FakeExchanger {
        kind: ProviderKind,
        fail: bool,
    }

    #[async_trait]
    impl OAuthCodeExchanger for FakeExchanger {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
            format!("https://provider.test/authorize?redirect_uri={}&state={}", redirect_uri, state)
        }

        async fn exchange_code(&self, code: &str, _redirect_uri: &str) -> DomainResult<String> {
            if self.fail {
                Err(DomainError::upstream("fake", "exchange rejected"))
            } else {
                Ok(format!("token-for-{}", code))
            }
        }
    }

    fn service(fail: bool) -> (OAuthSessionService, InMemoryCache) {
        let cache = InMemoryCache::new();
        let mut service = OAuthSessionService::new(Arc::new(cache.clone()), "https://api.test/", 300);
        service.register(Arc::new(FakeExchanger {
            kind: ProviderKind::Line,
            fail,
        }));
        (service, cache)
    }

    #[tokio::test]
    async fn test_start_then_complete_then_poll_once() {
        let (service, cache) = service(false);
        let start = service.start_session(ProviderKind::Line).await.unwrap();
        assert!(start
            .authorize_url
            .contains("https://api.test/auth/social/line/callback"));
        assert_eq!(
            service.poll_status(&start.session_id).await.unwrap(),
            OAuthSessionState::Pending
        );

        let outcome = service
            .handle_callback(ProviderKind::Line, Some("abc"), &start.session_id, None)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            OAuthSessionState::Completed {
                access_token: "token-for-abc".to_string()
            }
        );

        assert_eq!(service.poll_status(&start.session_id).await.unwrap(), outcome);
        assert_eq!(
            service.poll_status(&start.session_id).await.unwrap(),
            OAuthSessionState::Pending
        );
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_exchange_recorded_as_failed() {
        let (service, _) = service(true);
        let outcome = service
            .handle_callback(ProviderKind::Line, Some("abc"), "state-1", None)
            .await
            .unwrap();
        assert!(matches!(outcome, OAuthSessionState::Failed { .. }));
        assert!(matches!(
            service.poll_status("state-1").await.unwrap(),
            OAuthSessionState::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_code_rejected() {
        let (service, _) = service(false);
        let err = service
            .handle_callback(ProviderKind::Line, None, "state-1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationErr(_)));

        let denied = service
            .handle_callback(ProviderKind::Line, None, "state-2", Some("access_denied"))
            .await
            .unwrap();
        assert_eq!(
            denied,
            OAuthSessionState::Failed {
                error: "access_denied".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unconfigured_provider() {
        let (service, _) = service(false);
        assert!(service.start_session(ProviderKind::Facebook).await.is_err());
    }

    #[test]
    fn test_state_tokens_are_url_safe_and_distinct() {
        let a = generate_state();
        let b = generate_state();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
