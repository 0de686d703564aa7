//! Configuration for the token codec

use lc_shared::JwtConfig;

#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            access_token_expiry_minutes: config.access_token_expire_minutes,
            refresh_token_expiry_days: config.refresh_token_expire_days,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }
}
