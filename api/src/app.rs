//! Route table and application factory

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpResponse};
use lc_shared::ErrorResponse;

use crate::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::handlers::{auth, health, phone, social};
use crate::middleware::JwtAuth;
use crate::state::AppState;

/// Register every route; shared by the binary and the HTTP tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(auth::login))
                .route("/refresh", web::post().to(auth::refresh))
                .route("/logout", web::post().to(auth::logout))
                .service(
                    web::resource("/me")
                        .wrap(JwtAuth::new())
                        .route(web::get().to(auth::me)),
                )
                .service(
                    web::resource("/sessions")
                        .wrap(JwtAuth::new())
                        .route(web::get().to(auth::list_sessions)),
                )
                .service(
                    web::resource("/sessions/{id}")
                        .wrap(JwtAuth::new())
                        .route(web::delete().to(auth::revoke_session)),
                )
                .service(
                    web::resource("/login-history")
                        .wrap(JwtAuth::new())
                        .route(web::get().to(auth::login_history)),
                )
                .route(
                    "/social/session/{session_id}/status",
                    web::get().to(social::session_status),
                )
                .route("/social/{provider}", web::post().to(social::social_login))
                .route("/social/{provider}/session", web::post().to(social::start_session))
                .route("/social/{provider}/callback", web::get().to(social::callback)),
        )
        .service(
            web::scope("/phone")
                .route("/countries", web::get().to(phone::countries))
                .route("/send-code", web::post().to(phone::send_code))
                .route("/login-code", web::post().to(phone::send_login_code))
                .route("/verify-code", web::post().to(phone::verify_code))
                .route("/register", web::post().to(phone::register))
                .route("/login", web::post().to(phone::login)),
        );
}

/// Create the application over `state`; the caller adds CORS and request logging
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .configure(configure)
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "not_found",
        "The requested resource was not found",
    ))
}
