use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use lc_core::domain::{OAuthSessionState, ProviderKind};
use lc_core::errors::AuthError;

use crate::dto::{CallbackQuery, SocialLoginRequest};
use crate::error::{validate, ApiError};
use crate::state::AppState;
use crate::views;

use super::login_context;

fn provider_kind(name: &str) -> Result<ProviderKind, ApiError> {
    name.parse::<ProviderKind>().map_err(|_| {
        ApiError::from(AuthError::UnknownProvider {
            provider: name.to_string(),
        })
    })
}

/// POST /auth/social/{provider}
///
/// Exchange a provider access token (Google: ID token) for our token pair.
pub async fn social_login(
    req: HttpRequest,
    state: web::Data<AppState>,
    provider: web::Path<String>,
    body: web::Json<SocialLoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let kind = provider_kind(&provider)?;
    validate(&*body)?;
    let body = body.into_inner();

    let context = login_context(&req, body.device_info);
    let response = state.auth.social_login(kind, &body.access_token, &context).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /auth/social/{provider}/session
///
/// Start the browser flow; the app opens `authorize_url` and polls
/// `session_id`.
pub async fn start_session(
    state: web::Data<AppState>,
    provider: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let kind = provider_kind(&provider)?;
    let start = state.oauth.start_session(kind).await?;
    Ok(HttpResponse::Ok().json(start))
}

/// GET /auth/social/{provider}/callback?code&state
///
/// Always answers with an HTML page for the browser.
pub async fn callback(
    state: web::Data<AppState>,
    provider: web::Path<String>,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    let kind = match provider_kind(&provider) {
        Ok(kind) => kind,
        Err(e) => return views::error_page(e.status_code(), &e.message()),
    };

    let outcome = state
        .oauth
        .handle_callback(kind, query.code.as_deref(), &query.state, query.provider_error())
        .await;

    match outcome {
        Ok(OAuthSessionState::Completed { .. }) => views::success_page(kind),
        Ok(OAuthSessionState::Failed { error }) => {
            views::error_page(actix_web::http::StatusCode::OK, &error)
        }
        Ok(OAuthSessionState::Pending) => views::error_page(
            actix_web::http::StatusCode::OK,
            "Login is still in progress",
        ),
        Err(e) => {
            let e = ApiError::from(e);
            views::error_page(e.status_code(), &e.message())
        }
    }
}

/// GET /auth/social/session/{session_id}/status
///
/// A completed or failed record is returned once and then cleared.
pub async fn session_status(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let status = state.oauth.poll_status(&session_id).await?;
    Ok(HttpResponse::Ok().json(status))
}
