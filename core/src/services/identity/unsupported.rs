use async_trait::async_trait;

use crate::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use crate::errors::{AuthError, DomainResult};

use super::traits::IdentityProvider;

/// Placeholder for providers that are announced but not built (Apple, Instagram, Kapook)
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedIdentityProvider {
    kind: ProviderKind,
}

impl UnsupportedIdentityProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl IdentityProvider for UnsupportedIdentityProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn resolve_identity(&self, _credential: &Credential) -> DomainResult<ExternalIdentity> {
        Err(AuthError::ProviderNotImplemented {
            provider: self.kind.display_name().to_string(),
        }
        .into())
    }
}
