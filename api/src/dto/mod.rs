//! Request and response bodies for the HTTP surface

pub mod auth;
pub mod phone;
pub mod social;

pub use auth::{
    LoginHistoryEntry, LoginHistoryQuery, LoginRequest, LogoutRequest, RefreshRequest,
    SessionResponse, SocialLoginRequest, UserProfile,
};
pub use phone::{
    CountriesQuery, PhoneLoginRequest, RegisterRequest, SendCodeRequest, SendCodeResponse,
    VerifyCodeRequest, VerifyCodeResponse,
};
pub use social::CallbackQuery;

pub use lc_shared::types::MessageResponse;
