//! Credential & token codec: bcrypt password hashing and HS256 JWTs with a
//! unique `jti` per token.

mod codec;
mod config;
mod password;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use password::{hash_password, hash_password_with_cost, verify_password};
