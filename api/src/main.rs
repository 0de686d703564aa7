use actix_web::{web, HttpServer};
use anyhow::Context;
use lc_api::{bootstrap, create_app, middleware::create_cors, telemetry};
use lc_shared::AppConfig;
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging)?;

    if let Err(errors) = config.validate() {
        for error in &errors {
            tracing::error!("{}", error);
        }
        anyhow::bail!("Invalid configuration ({} problem(s))", errors.len());
    }

    tracing::info!(
        environment = %config.environment,
        storage = ?config.storage,
        "Starting Live Commerce API server"
    );

    let state = web::Data::new(bootstrap::build_state(&config).await?);

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    tracing::info!(address = %bind_address, "Server will bind");

    let cors_config = config.cors.clone();
    let environment = config.environment;
    let mut server = HttpServer::new(move || {
        create_app(state.clone())
            .wrap(TracingLogger::default())
            .wrap(create_cors(&cors_config, environment))
    });
    if workers > 0 {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server terminated with an error")
}
