use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::value_objects::identity::ProviderKind;
use crate::errors::{AuthError, DomainResult};

use super::traits::IdentityProvider;
use super::unsupported::UnsupportedIdentityProvider;

/// Providers keyed by kind, built once at startup
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with the announced-but-unbuilt providers
    pub fn with_unsupported_placeholders() -> Self {
        let mut registry = Self::new();
        for kind in [ProviderKind::Apple, ProviderKind::Instagram, ProviderKind::Kapook] {
            registry.register(Arc::new(UnsupportedIdentityProvider::new(kind)));
        }
        registry
    }

    /// Replaces any provider already registered for the same kind
    pub fn register(&mut self, provider: Arc<dyn IdentityProvider>) -> &mut Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> DomainResult<Arc<dyn IdentityProvider>> {
        self.providers.get(&kind).cloned().ok_or_else(|| {
            AuthError::ProviderNotConfigured {
                provider: kind.display_name().to_string(),
            }
            .into()
        })
    }

    /// Look a provider up by its wire name, e.g. from a URL path segment
    pub fn resolve(&self, name: &str) -> DomainResult<Arc<dyn IdentityProvider>> {
        let kind: ProviderKind = name.parse().map_err(|_| AuthError::UnknownProvider {
            provider: name.to_string(),
        })?;
        self.get(kind)
    }

    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<ProviderKind> = self.providers.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::identity::Credential;
    use crate::errors::DomainError;

    #[tokio::test]
    async fn test_placeholders_fail_with_not_implemented() {
        let registry = ProviderRegistry::with_unsupported_placeholders();
        let apple = registry.resolve("apple").unwrap();

        let err = apple
            .resolve_identity(&Credential::AccessToken("token".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::ProviderNotImplemented { .. })));
    }

    #[test]
    fn test_unknown_and_unconfigured_names() {
        let registry = ProviderRegistry::with_unsupported_placeholders();

        assert!(matches!(
            registry.resolve("myspace"),
            Err(DomainError::Auth(AuthError::UnknownProvider { .. }))
        ));
        assert!(matches!(
            registry.resolve("line"),
            Err(DomainError::Auth(AuthError::ProviderNotConfigured { .. }))
        ));
        assert_eq!(
            registry.kinds(),
            vec![ProviderKind::Apple, ProviderKind::Instagram, ProviderKind::Kapook]
        );
    }
}
