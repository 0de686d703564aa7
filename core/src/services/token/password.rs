//! bcrypt password hashing

use crate::errors::DomainError;

pub fn hash_password(plaintext: &str) -> Result<String, DomainError> {
    hash_password_with_cost(plaintext, bcrypt::DEFAULT_COST)
}

/// Lower costs are only meant for tests
pub fn hash_password_with_cost(plaintext: &str, cost: u32) -> Result<String, DomainError> {
    bcrypt::hash(plaintext, cost)
        .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
}

/// A malformed stored hash verifies as `false`
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    match bcrypt::verify(plaintext, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, event = "password_hash_unreadable", "Stored password hash could not be parsed");
            false
        }
    }
}
