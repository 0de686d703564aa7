//! JWT authentication middleware for protecting API endpoints.
//!
//! The bearer token is resolved through `AuthService::authenticate`, so a
//! token is only accepted while its session is active and still carries the
//! token's access jti. The resolved user and session are injected into the
//! request extensions as an `AuthContext`.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures_util::future::LocalBoxFuture;
use lc_core::domain::{AuthStatus, Session, SessionId, User, UserId};
use lc_core::errors::DomainError;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, available to handlers as an extractor
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub session: Session,
}

impl AuthContext {
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn session_id(&self) -> SessionId {
        self.session.id
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(context) => {
                    req.extensions_mut().insert(context);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(error) => {
                    let response = error.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Resolve the bearer token of `req` to its user and session
async fn authenticate(req: &ServiceRequest) -> Result<AuthContext, ApiError> {
    let token = extract_bearer_token(req).ok_or_else(unauthorized)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| ApiError::new(DomainError::internal("AppState is not registered")))?;

    match state.auth.authenticate(&token).await? {
        AuthStatus::Authenticated(authenticated) => {
            let authenticated = *authenticated;
            Ok(AuthContext {
                user: authenticated.user,
                session: authenticated.session,
            })
        }
        AuthStatus::Unauthenticated(reason) => {
            log::debug!("Rejected bearer token: {}", reason);
            Err(unauthorized())
        }
    }
}

fn unauthorized() -> ApiError {
    ApiError::new(DomainError::Unauthorized)
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| unauthorized().into());

        ready(result)
    }
}
