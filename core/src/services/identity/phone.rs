use std::sync::Arc;

use async_trait::async_trait;
use lc_shared::phone::normalize_phone_number;

use crate::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use crate::errors::{AuthError, DomainResult};
use crate::services::otp::OtpService;

use super::traits::IdentityProvider;
use super::unexpected_credential;

/// Phone number + OTP from the verification cache.
///
/// A missing record and a mismatched code are the same
/// `InvalidVerificationCode`. The code is not consumed here; the caller
/// deletes it once the login has committed.
pub struct PhoneIdentityProvider {
    otp: Arc<OtpService>,
}

impl PhoneIdentityProvider {
    pub fn new(otp: Arc<OtpService>) -> Self {
        Self { otp }
    }
}

#[async_trait]
impl IdentityProvider for PhoneIdentityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Phone
    }

    async fn resolve_identity(&self, credential: &Credential) -> DomainResult<ExternalIdentity> {
        let Credential::PhoneOtp { phone, code } = credential else {
            return Err(unexpected_credential(self.kind()));
        };

        let phone = normalize_phone_number(phone);
        if !self.otp.check_code(&phone, code).await? {
            return Err(AuthError::InvalidVerificationCode.into());
        }
        Ok(ExternalIdentity::new(phone))
    }
}
