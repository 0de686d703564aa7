//! Shared application state handed to every handler

use std::sync::Arc;

use lc_core::repositories::CountryRepository;
use lc_core::{AuthService, OAuthSessionService, OtpService};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub otp: Arc<OtpService>,
    pub oauth: Arc<OAuthSessionService>,
    pub countries: Arc<dyn CountryRepository>,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        otp: Arc<OtpService>,
        oauth: Arc<OAuthSessionService>,
        countries: Arc<dyn CountryRepository>,
    ) -> Self {
        Self {
            auth,
            otp,
            oauth,
            countries,
        }
    }
}
