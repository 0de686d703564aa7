use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::token::verify_password;

use super::traits::IdentityProvider;
use super::unexpected_credential;

/// Email + password against the local bcrypt hash.
///
/// Resolves to an identity whose `provider_user_id` is the account email.
pub struct PasswordIdentityProvider {
    users: Arc<dyn UserRepository>,
}

impl PasswordIdentityProvider {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn invalid() -> DomainError {
    AuthError::InvalidCredential {
        provider: ProviderKind::Password.as_str().to_string(),
    }
    .into()
}

#[async_trait]
impl IdentityProvider for PasswordIdentityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Password
    }

    async fn resolve_identity(&self, credential: &Credential) -> DomainResult<ExternalIdentity> {
        let Credential::Password { email, password } = credential else {
            return Err(unexpected_credential(self.kind()));
        };

        let email = email.trim().to_lowercase();
        // Unknown email, missing hash and wrong password are indistinguishable
        let user = self.users.find_by_email(&email).await?.ok_or_else(invalid)?;
        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !verify_password(password, hash) {
            return Err(invalid());
        }

        Ok(ExternalIdentity {
            provider_user_id: email,
            display_name: Some(user.display_name),
            email: user.email,
            avatar_url: user.avatar_url,
            email_verified: user.is_verified,
            provider_username: Some(user.username),
        })
    }
}
