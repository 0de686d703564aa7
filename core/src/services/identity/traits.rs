use async_trait::async_trait;

use crate::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use crate::errors::DomainResult;

/// One way of proving who you are.
///
/// Implementations verify the credential (locally or against the provider's
/// endpoint) and return what the provider knows about the account. Failure to
/// verify is `AuthError::InvalidCredential` or, for phone codes,
/// `AuthError::InvalidVerificationCode`; transport trouble is
/// `DomainError::Upstream`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn resolve_identity(&self, credential: &Credential) -> DomainResult<ExternalIdentity>;
}
