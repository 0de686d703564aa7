use async_trait::async_trait;

use crate::domain::entities::country::Country;
use crate::errors::DomainError;

#[async_trait]
pub trait CountryRepository: Send + Sync {
    /// Active countries ordered by `display_order`
    async fn list_active(&self) -> Result<Vec<Country>, DomainError>;
}
