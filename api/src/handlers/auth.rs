use actix_web::{web, HttpRequest, HttpResponse};
use lc_core::domain::{Credential, ProviderKind, SessionId};

use crate::dto::{
    LoginHistoryEntry, LoginHistoryQuery, LoginRequest, LogoutRequest, MessageResponse,
    RefreshRequest, SessionResponse, UserProfile,
};
use crate::error::{validate, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

use super::login_context;

/// POST /auth/login
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*body)?;
    let body = body.into_inner();

    let context = login_context(&req, body.device_info);
    let credential = Credential::Password {
        email: body.email,
        password: body.password,
    };
    let response = state.auth.login(ProviderKind::Password, credential, &context).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /auth/refresh
pub async fn refresh(
    state: web::Data<AppState>,
    body: web::Json<RefreshRequest>,
) -> Result<HttpResponse, ApiError> {
    validate(&*body)?;
    let response = state.auth.refresh(&body.refresh_token).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /auth/logout
///
/// Always 200, whatever the token; a broken body counts as an empty one.
pub async fn logout(
    state: web::Data<AppState>,
    body: Option<web::Json<LogoutRequest>>,
) -> HttpResponse {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    if let Err(e) = state.auth.logout(&body.refresh_token).await {
        log::warn!("Logout failed to deactivate session: {}", e);
    }
    HttpResponse::Ok().json(MessageResponse::new("Successfully logged out"))
}

/// GET /auth/me
pub async fn me(auth: AuthContext) -> HttpResponse {
    let session_id = auth.session_id();
    HttpResponse::Ok().json(UserProfile::new(auth.user, session_id))
}

/// GET /auth/sessions
pub async fn list_sessions(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    let current = auth.session_id();
    let sessions: Vec<SessionResponse> = state
        .auth
        .list_sessions(auth.user_id())
        .await?
        .into_iter()
        .map(|session| SessionResponse::new(session, current))
        .collect();
    Ok(HttpResponse::Ok().json(sessions))
}

/// DELETE /auth/sessions/{id}
pub async fn revoke_session(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<SessionId>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    state.auth.revoke_session(auth.user_id(), session_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Session revoked")))
}

/// GET /auth/login-history?limit=N
pub async fn login_history(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<LoginHistoryQuery>,
) -> Result<HttpResponse, ApiError> {
    validate(&*query)?;
    let entries: Vec<LoginHistoryEntry> = state
        .auth
        .login_history(auth.user_id(), query.limit())
        .await?
        .into_iter()
        .map(LoginHistoryEntry::from)
        .collect();
    Ok(HttpResponse::Ok().json(entries))
}
