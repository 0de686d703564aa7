//! Identity resolution providers and the registry that dispatches to them.

mod password;
mod phone;
mod registry;
mod traits;
mod unsupported;

pub use password::PasswordIdentityProvider;
pub use phone::PhoneIdentityProvider;
pub use registry::ProviderRegistry;
pub use traits::IdentityProvider;
pub use unsupported::UnsupportedIdentityProvider;

use crate::domain::value_objects::identity::ProviderKind;
use crate::errors::{DomainError, ValidationError};

/// Error for a credential variant the provider does not accept
pub(crate) fn unexpected_credential(kind: ProviderKind) -> DomainError {
    ValidationError::InvalidFormat {
        field: format!("{} credential", kind),
    }
    .into()
}
