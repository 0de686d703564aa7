//! CORS configuration for the mobile apps and web clients.
//!
//! Development is permissive. Production only admits the configured origins
//! plus the app webview schemes.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use lc_shared::config::CorsConfig;
use lc_shared::Environment;

const APP_ORIGINS: [&str; 4] = [
    "capacitor://localhost",
    "ionic://localhost",
    "http://localhost",
    "https://localhost",
];

pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    if environment.is_production() {
        create_production_cors(config)
    } else {
        create_development_cors(config)
    }
}

fn create_development_cors(config: &CorsConfig) -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-requested-with"),
            header::HeaderName::from_static("x-app-version"),
            header::HeaderName::from_static("x-platform"),
        ])
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(config.max_age)
        .supports_credentials()
}

fn create_production_cors(config: &CorsConfig) -> Cors {
    log::info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-app-version"),
            header::HeaderName::from_static("x-platform"),
        ])
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(config.max_age);

    for origin in &config.allowed_origins {
        log::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }
    for origin in APP_ORIGINS {
        cors = cors.allowed_origin(origin);
    }

    cors
}

fn allowed_methods() -> Vec<Method> {
    vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ]
}
